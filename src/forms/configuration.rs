use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};

use crate::domain::configuration::ConfigKey;
use crate::forms::FormError;

#[derive(MultipartForm)]
/// Site configuration screen: one text input per key and one optional file
/// per image key.
pub struct SaveConfigurationForm {
    #[multipart(rename = "EmailFromName")]
    pub email_from_name: Option<Text<String>>,
    #[multipart(rename = "EmailSend")]
    pub email_send: Option<Text<String>>,
    #[multipart(rename = "EmailSendPassword")]
    pub email_send_password: Option<Text<String>>,
    #[multipart(rename = "EmailReceive")]
    pub email_receive: Option<Text<String>>,
    #[multipart(rename = "EmailSmtpHost")]
    pub email_smtp_host: Option<Text<String>>,
    #[multipart(rename = "EmailPort")]
    pub email_port: Option<Text<String>>,
    #[multipart(rename = "SDTSales")]
    pub sales_phone: Option<Text<String>>,
    #[multipart(rename = "WebName")]
    pub web_name: Option<Text<String>>,
    #[multipart(rename = "ImgLogo", limit = "10MB")]
    pub logo: Option<TempFile>,
    #[multipart(rename = "ImgHome", limit = "10MB")]
    pub home: Option<TempFile>,
    #[multipart(rename = "ImgBackground", limit = "10MB")]
    pub background: Option<TempFile>,
}

/// Raw image picked for one configuration key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedImage {
    pub key: ConfigKey,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Parsed configuration form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationPayload {
    pub values: Vec<(ConfigKey, String)>,
    pub images: Vec<PickedImage>,
}

impl ConfigurationPayload {
    /// Adds `image`, replacing an earlier pick for the same key.
    pub fn pick_image(&mut self, image: PickedImage) {
        self.images.retain(|picked| picked.key != image.key);
        self.images.push(image);
    }
}

impl TryFrom<SaveConfigurationForm> for ConfigurationPayload {
    type Error = FormError;

    fn try_from(form: SaveConfigurationForm) -> Result<Self, Self::Error> {
        let texts = [
            (ConfigKey::EmailFromName, form.email_from_name),
            (ConfigKey::EmailSend, form.email_send),
            (ConfigKey::EmailSendPassword, form.email_send_password),
            (ConfigKey::EmailReceive, form.email_receive),
            (ConfigKey::EmailSmtpHost, form.email_smtp_host),
            (ConfigKey::EmailPort, form.email_port),
            (ConfigKey::SalesPhone, form.sales_phone),
            (ConfigKey::WebName, form.web_name),
        ];
        let mut payload = Self {
            values: texts
                .into_iter()
                .filter_map(|(key, text)| {
                    text.map(|text| (key, text.into_inner().trim().to_string()))
                })
                .collect(),
            images: Vec::new(),
        };

        let files = [
            (ConfigKey::ImgLogo, form.logo),
            (ConfigKey::ImgHome, form.home),
            (ConfigKey::ImgBackground, form.background),
        ];
        for (key, file) in files {
            let Some(file) = file.filter(|file| file.size > 0) else {
                continue;
            };
            payload.pick_image(read_temp_file(key, file)?);
        }
        Ok(payload)
    }
}

fn read_temp_file(key: ConfigKey, file: TempFile) -> Result<PickedImage, FormError> {
    let bytes = std::fs::read(file.file.path()).map_err(|_| FormError::InvalidUpload)?;
    Ok(PickedImage {
        key,
        file_name: file.file_name.unwrap_or_else(|| key.as_str().to_string()),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(key: ConfigKey, name: &str) -> PickedImage {
        PickedImage {
            key,
            file_name: name.to_string(),
            bytes: vec![1],
        }
    }

    #[test]
    fn new_pick_replaces_previous_one_for_same_key() {
        let mut payload = ConfigurationPayload::default();
        payload.pick_image(picked(ConfigKey::ImgLogo, "old.png"));
        payload.pick_image(picked(ConfigKey::ImgHome, "home.png"));
        payload.pick_image(picked(ConfigKey::ImgLogo, "new.png"));
        assert_eq!(payload.images.len(), 2);
        let logo = payload
            .images
            .iter()
            .find(|image| image.key == ConfigKey::ImgLogo)
            .unwrap();
        assert_eq!(logo.file_name, "new.png");
    }
}
