//! Site configuration screen and the public site settings.

use crate::domain::configuration::{ConfigKey, SiteConfiguration, WebConfig};
use crate::domain::loan_request::ImageUpload;
use crate::dto::configuration::ConfigurationPageData;
use crate::forms::configuration::PickedImage;
use crate::gateway::{ConfigurationReader, ConfigurationWriter};
use crate::media::compress_image;
use crate::notifications::NotificationStore;
use crate::services::{ServiceError, ServiceResult};

pub const CONFIGURATION_PATH: &str = "/admin/configuration";
pub const SAVE_SUCCESS: &str = "Cập nhật cấu hình thành công";

async fn load_site_configuration<R>(gateway: &R) -> ServiceResult<SiteConfiguration>
where
    R: ConfigurationReader + ?Sized,
{
    let entries = gateway.get_configuration().await.map_err(|err| {
        log::error!("Failed to load configuration: {err}");
        err
    })?;
    Ok(SiteConfiguration::from_entries(entries))
}

pub async fn load_configuration<R>(gateway: &R) -> ServiceResult<ConfigurationPageData>
where
    R: ConfigurationReader + ?Sized,
{
    let config = load_site_configuration(gateway).await?;
    Ok(ConfigurationPageData::from(&config))
}

/// Settings used by the public pages.
pub async fn load_web_config<R>(gateway: &R) -> ServiceResult<WebConfig>
where
    R: ConfigurationReader + ?Sized,
{
    let entries = gateway.get_configuration().await.map_err(|err| {
        log::error!("Failed to load web configuration: {err}");
        err
    })?;
    Ok(WebConfig::from_entries(&entries))
}

/// Compresses the picked images. Each upload is keyed by its configuration
/// key so the backend replaces the stored image.
///
/// CPU bound; call it through `web::block`.
pub fn compress_picked_images(images: Vec<PickedImage>) -> ServiceResult<Vec<ImageUpload>> {
    images
        .into_iter()
        .map(|picked| {
            let compressed = compress_image(&picked.file_name, &picked.bytes).map_err(|err| {
                log::error!("Failed to compress {}: {err}", picked.key.as_str());
                ServiceError::Form(err.to_string())
            })?;
            Ok(ImageUpload {
                key: picked.key.as_str().to_string(),
                file_name: compressed.file_name,
                content_type: compressed.content_type,
                bytes: compressed.bytes,
            })
        })
        .collect()
}

/// Merges the posted values into the current configuration and saves it.
///
/// A blank secret keeps the stored value. Image keys are set by the backend.
pub async fn save_configuration<R>(
    gateway: &R,
    user_name: &str,
    values: Vec<(ConfigKey, String)>,
    uploads: Vec<ImageUpload>,
    notifications: &NotificationStore,
) -> ServiceResult<()>
where
    R: ConfigurationReader + ConfigurationWriter + ?Sized,
{
    let mut config = load_site_configuration(gateway).await?;
    for (key, value) in values {
        if key.is_image() || (key.is_secret() && value.is_empty()) {
            continue;
        }
        config.set(key, value);
    }

    match gateway
        .save_configuration(&config.entries(), &uploads, user_name)
        .await
    {
        Ok(()) => {
            notifications.success(SAVE_SUCCESS);
            Ok(())
        }
        Err(err) => {
            log::error!("Failed to save configuration: {err}");
            if !err.is_unauthorized() {
                notifications.error(err.to_string());
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration::ConfigEntry;
    use crate::gateway::GatewayError;
    use crate::gateway::mock::MockGateway;
    use crate::notifications::NotificationKind;

    fn entry(key: &str, value: &str) -> ConfigEntry {
        ConfigEntry {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn stored() -> Vec<ConfigEntry> {
        vec![
            entry("WebName", "PVG"),
            entry("EmailSendPassword", "s3cret"),
            entry("ImgLogo", "https://cdn/logo.png"),
            entry("Legacy", "1"),
        ]
    }

    #[tokio::test]
    async fn blank_secret_keeps_stored_password() {
        let mut gateway = MockGateway::new();
        gateway.expect_get_configuration().returning(|| Ok(stored()));
        gateway
            .expect_save_configuration()
            .withf(|entries, images, user| {
                let value = |key: &str| {
                    entries
                        .iter()
                        .find(|entry| entry.key == key)
                        .map(|entry| entry.value.as_str())
                };
                value("EmailSendPassword") == Some("s3cret")
                    && value("WebName") == Some("Vay nhanh")
                    && value("ImgLogo") == Some("https://cdn/logo.png")
                    && value("Legacy") == Some("1")
                    && images.is_empty()
                    && user == "admin"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let store = NotificationStore::new();
        save_configuration(
            &gateway,
            "admin",
            vec![
                (ConfigKey::WebName, "Vay nhanh".into()),
                (ConfigKey::EmailSendPassword, String::new()),
            ],
            Vec::new(),
            &store,
        )
        .await
        .unwrap();
        assert_eq!(store.take().map(|n| n.kind), Some(NotificationKind::Success));
    }

    #[tokio::test]
    async fn failed_save_is_notified() {
        let mut gateway = MockGateway::new();
        gateway.expect_get_configuration().returning(|| Ok(stored()));
        gateway
            .expect_save_configuration()
            .returning(|_, _, _| Err(GatewayError::server(500, "Lưu cấu hình lỗi")));
        let store = NotificationStore::new();
        let result = save_configuration(&gateway, "admin", Vec::new(), Vec::new(), &store).await;
        assert!(matches!(result, Err(ServiceError::Gateway(_))));
        assert_eq!(
            store.take().map(|n| n.message).as_deref(),
            Some("Lưu cấu hình lỗi")
        );
    }

    #[tokio::test]
    async fn page_hides_secret_value() {
        let mut gateway = MockGateway::new();
        gateway.expect_get_configuration().returning(|| Ok(stored()));
        let page = load_configuration(&gateway).await.unwrap();
        let secret = page
            .fields
            .iter()
            .find(|field| field.key == "EmailSendPassword")
            .unwrap();
        assert!(secret.is_secret);
        assert_eq!(secret.value, "");
    }

    #[test]
    fn broken_image_is_a_form_error() {
        let picked = PickedImage {
            key: ConfigKey::ImgLogo,
            file_name: "logo.png".into(),
            bytes: vec![0, 1, 2],
        };
        let result = compress_picked_images(vec![picked]);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
