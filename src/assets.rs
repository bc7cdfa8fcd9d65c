//! Browser-side asset loading: the font, both star sprites and the story
//! data are requested together and joined into one `LoadedAssets`.

use js_sys::{Promise, Uint8Array};
use starpath_core::{AssetKind, AssetPaths, LoadError, StoryDataset};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// RGBA8 pixels ready for a texture upload.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub struct LoadedAssets {
    pub dataset: StoryDataset,
    pub font_family: String,
    pub star: DecodedImage,
    pub background_star: DecodedImage,
}

fn js_reason(err: JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

fn fetch_error(asset: AssetKind, reason: impl Into<String>) -> LoadError {
    LoadError::Fetch {
        asset,
        reason: reason.into(),
    }
}

async fn response(asset: AssetKind, request: Promise) -> Result<web::Response, LoadError> {
    let value = JsFuture::from(request)
        .await
        .map_err(|e| fetch_error(asset, js_reason(e)))?;
    let resp: web::Response = value
        .dyn_into()
        .map_err(|_| fetch_error(asset, "not a Response"))?;
    if !resp.ok() {
        return Err(fetch_error(
            asset,
            format!("HTTP {} {}", resp.status(), resp.status_text()),
        ));
    }
    Ok(resp)
}

async fn bytes(asset: AssetKind, request: Promise) -> Result<Vec<u8>, LoadError> {
    let resp = response(asset, request).await?;
    let buffer = resp
        .array_buffer()
        .map_err(|e| fetch_error(asset, js_reason(e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fetch_error(asset, js_reason(e)))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

async fn text(asset: AssetKind, request: Promise) -> Result<String, LoadError> {
    let resp = response(asset, request).await?;
    let body = resp.text().map_err(|e| fetch_error(asset, js_reason(e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| fetch_error(asset, js_reason(e)))?
        .as_string()
        .ok_or_else(|| fetch_error(asset, "body is not text"))
}

fn decode(asset: AssetKind, data: &[u8]) -> Result<DecodedImage, LoadError> {
    let img = image::load_from_memory(data)
        .map_err(|e| LoadError::Decode {
            asset,
            reason: e.to_string(),
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: img.into_raw(),
    })
}

/// Registers the font face and resolves once it is usable.
fn start_font(
    document: &web::Document,
    paths: &AssetPaths,
) -> Result<(web::FontFace, Promise), LoadError> {
    let source = format!("url({})", paths.url(AssetKind::Font));
    let face = web::FontFace::new_with_str(&paths.font_family, &source)
        .map_err(|e| fetch_error(AssetKind::Font, js_reason(e)))?;
    let loading = face
        .load()
        .map_err(|e| fetch_error(AssetKind::Font, js_reason(e)))?;
    _ = document.fonts().add(&face);
    Ok((face, loading))
}

/// Starts every request up front, then waits for all of them. The first
/// failure (in font, textures, story order) is returned.
pub async fn load_all(paths: &AssetPaths) -> Result<LoadedAssets, LoadError> {
    let window = web::window().ok_or_else(|| fetch_error(AssetKind::StoryData, "no window"))?;
    let document = window
        .document()
        .ok_or_else(|| fetch_error(AssetKind::Font, "no document"))?;

    log::info!("[assets] loading font, textures and story data");
    let font = start_font(&document, paths);
    let star_req = window.fetch_with_str(paths.url(AssetKind::StarTexture));
    let background_req = window.fetch_with_str(paths.url(AssetKind::BackgroundStarTexture));
    let story_req = window.fetch_with_str(paths.url(AssetKind::StoryData));

    let (_face, font_loading) = font?;
    JsFuture::from(font_loading)
        .await
        .map_err(|e| fetch_error(AssetKind::Font, js_reason(e)))?;

    let star = bytes(AssetKind::StarTexture, star_req).await?;
    let star = decode(AssetKind::StarTexture, &star)?;
    let background = bytes(AssetKind::BackgroundStarTexture, background_req).await?;
    let background_star = decode(AssetKind::BackgroundStarTexture, &background)?;

    let json = text(AssetKind::StoryData, story_req).await?;
    let dataset = StoryDataset::from_json(&json)?;

    log::info!(
        "[assets] ready: {} events, textures {}x{} and {}x{}",
        dataset.len(),
        star.width,
        star.height,
        background_star.width,
        background_star.height
    );
    Ok(LoadedAssets {
        dataset,
        font_family: paths.font_family.clone(),
        star,
        background_star,
    })
}

/// Optional `config.json`; anything other than a readable file yields `None`.
pub async fn fetch_optional_text(url: &str) -> Option<String> {
    let window = web::window()?;
    let resp = JsFuture::from(window.fetch_with_str(url)).await.ok()?;
    let resp: web::Response = resp.dyn_into().ok()?;
    if !resp.ok() {
        return None;
    }
    JsFuture::from(resp.text().ok()?).await.ok()?.as_string()
}
