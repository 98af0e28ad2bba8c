use executor_portal_core::api::{
    endpoints, fields, DataAllFilesResponse, DateRangePreview, DateRangePreviewResponse, FetchError, FolderEntry,
    FolderFile, FolderFilesResponse, FoldersResponse,
};
use executor_portal_core::ClientSettings;
use serde::de::DeserializeOwned;
use web_sys::console;

pub const BASE: &str = ""; // use same-origin relative URLs

fn url(path: &str) -> String { format!("{}{}", BASE, path) }

fn map_net(e: reqwasm::Error) -> FetchError { FetchError::Network(e.to_string()) }

async fn read_json<T: DeserializeOwned>(resp: reqwasm::http::Response) -> Result<T, FetchError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_else(|_| "HTTP Fehler".into());
        return Err(FetchError::Http { status, body });
    }
    let text = resp.text().await.map_err(map_net)?;
    Ok(serde_json::from_str(&text)?)
}

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, FetchError> {
    let resp = reqwasm::http::Request::get(&url(path)).send().await.map_err(map_net)?;
    read_json(resp).await
}

pub async fn list_folders() -> Result<Vec<FolderEntry>, FetchError> {
    get_json::<FoldersResponse>(endpoints::FOLDERS).await?.into_result()
}

pub async fn list_folder_files(path: &str) -> Result<Vec<FolderFile>, FetchError> {
    let path = format!("{}?path={}", endpoints::FOLDER_FILES, urlencoding::encode(path));
    get_json::<FolderFilesResponse>(&path).await?.into_result()
}

pub async fn list_data_all_files() -> Result<Vec<String>, FetchError> {
    Ok(get_json::<DataAllFilesResponse>(endpoints::DATA_ALL_FILES).await?.files)
}

/// Uploads one spreadsheet and reads back the date span of its rows.
pub async fn preview_date_range(file: &web_sys::File) -> Result<DateRangePreview, FetchError> {
    let form = web_sys::FormData::new().map_err(|e| FetchError::Network(format!("{:?}", e)))?;
    form.append_with_blob_and_filename(fields::PREVIEW_FILE, file, &file.name())
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;
    let resp = reqwasm::http::Request::post(&url(endpoints::PREVIEW_DATE_RANGE))
        .body(form)
        .send()
        .await
        .map_err(map_net)?;
    read_json::<DateRangePreviewResponse>(resp).await?.into_result()
}

/// Client settings published by the host; any failure falls back to the built-in defaults.
pub async fn load_client_settings() -> ClientSettings {
    match get_json::<ClientSettings>(endpoints::UI_CONFIG).await {
        Ok(settings) => settings,
        Err(e) => {
            console::warn_1(&format!("ui-config.json nicht geladen, Standardwerte aktiv: {}", e).into());
            ClientSettings::default()
        }
    }
}
