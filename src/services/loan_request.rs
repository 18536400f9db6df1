//! Public multi-step loan request form.

use uuid::Uuid;

use crate::domain::types::ProductId;
use crate::dto::loan_request::LoanWizardData;
use crate::forms::loan_request::{LoanStepForm, PickedFile, StepAction};
use crate::gateway::LoanRequestWriter;
use crate::media::compress_image;
use crate::notifications::NotificationStore;
use crate::services::{ServiceError, ServiceResult};
use crate::wizard::{DraftStore, MAX_STAGED_IMAGES, StagedImage};

pub const REQUEST_PATH: &str = "/request";
pub const SUBMIT_SUCCESS: &str = "Gửi yêu cầu thành công.";

/// Wizard page for the draft `id`. A product picked on the catalogue
/// (`/request?product=`) is remembered for the submission; without one the
/// page is rendered without storing anything.
pub fn open_wizard(drafts: &DraftStore, id: Uuid, product: Option<&str>) -> LoanWizardData {
    match product.map(str::trim).filter(|p| !p.is_empty()) {
        Some(product) => drafts.update(id, |draft| {
            draft.product_id = Some(product.to_string());
            LoanWizardData::new(draft)
        }),
        None => LoanWizardData::new(&drafts.load(Some(id))),
    }
}

/// Keeps the posted fields and moves one step in the chosen direction.
/// Returns the action so the caller can continue with a submission.
pub fn apply_step(drafts: &DraftStore, id: Uuid, form: &LoanStepForm) -> StepAction {
    let pairs = form.pairs();
    drafts.update(id, |draft| {
        draft.form.merge(&pairs);
        match form.action {
            StepAction::Back => draft.go_back(),
            StepAction::Next => draft.go_next(),
            StepAction::Submit => {}
        }
    });
    form.action
}

/// Compresses picked files. Files that are not images are left out and
/// counted.
///
/// CPU bound; call it through `web::block`.
pub fn compress_files(files: Vec<PickedFile>) -> (Vec<StagedImage>, usize) {
    let mut rejected = 0;
    let images = files
        .into_iter()
        .filter_map(|file| match compress_image(&file.file_name, &file.bytes) {
            Ok(compressed) => Some(StagedImage::new(
                compressed.file_name,
                compressed.content_type,
                compressed.bytes,
            )),
            Err(err) => {
                log::warn!("Skipping upload {}: {err}", file.file_name);
                rejected += 1;
                None
            }
        })
        .collect();
    (images, rejected)
}

/// Free image slots of the draft `id`.
pub fn remaining_slots(drafts: &DraftStore, id: Uuid) -> usize {
    drafts
        .inspect(id, |draft| draft.remaining_slots())
        .unwrap_or(MAX_STAGED_IMAGES)
}

/// Stages compressed images up to the cap and returns how many were kept.
pub fn stage_images(
    drafts: &DraftStore,
    id: Uuid,
    images: Vec<StagedImage>,
    rejected: usize,
    notifications: &NotificationStore,
) -> usize {
    if rejected > 0 {
        notifications.warning(format!("Bỏ qua {rejected} tệp không phải hình ảnh"));
    }
    drafts.update(id, |draft| draft.stage(images))
}

pub fn remove_image(drafts: &DraftStore, id: Uuid, preview_url: &str) -> bool {
    drafts
        .update_existing(id, |draft| draft.remove_by_preview(preview_url))
        .unwrap_or(false)
}

/// Bytes and content type of a staged image, for its preview URL.
pub fn staged_image(drafts: &DraftStore, id: Uuid, image_id: Uuid) -> ServiceResult<StagedImage> {
    drafts
        .inspect(id, |draft| draft.find_image(image_id).cloned())
        .flatten()
        .ok_or(ServiceError::NotFound)
}

/// Validates and sends the draft. On success the draft is cleared; on any
/// failure it is kept and the reason is notified. Returns whether the
/// request was sent.
pub async fn submit_request<R>(
    gateway: &R,
    drafts: &DraftStore,
    id: Uuid,
    default_product_id: &str,
    notifications: &NotificationStore,
) -> bool
where
    R: LoanRequestWriter + ?Sized,
{
    let draft = drafts.load(Some(id));
    let product_id = draft
        .product_id
        .as_deref()
        .and_then(|product| ProductId::new(product).ok())
        .or_else(|| ProductId::new(default_product_id).ok());
    let Some(product_id) = product_id else {
        log::error!("No product configured for loan requests");
        notifications.error("Gửi thất bại: Chưa chọn sản phẩm");
        return false;
    };

    let submission = match draft.form.into_submission(product_id, draft.uploads()) {
        Ok(submission) => submission,
        Err(err) => {
            notifications.error(err.to_string());
            return false;
        }
    };

    match gateway.submit_request(&submission).await {
        Ok(()) => {
            drafts.clear(id);
            notifications.success(SUBMIT_SUCCESS);
            true
        }
        Err(err) => {
            log::error!("Failed to submit loan request: {err}");
            notifications.error(format!("Gửi thất bại: {err}"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::gateway::GatewayError;
    use crate::gateway::mock::MockGateway;
    use crate::notifications::NotificationKind;
    use crate::wizard::WizardStep;

    fn step_form(action: StepAction, values: &[(&str, &str)]) -> LoanStepForm {
        LoanStepForm {
            action,
            values: values
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn filled(drafts: &DraftStore, id: Uuid, name: &str, phone: &str) {
        apply_step(
            drafts,
            id,
            &step_form(StepAction::Submit, &[("fullname", name), ("phone", phone)]),
        );
    }

    fn image(name: &str) -> StagedImage {
        StagedImage::new(name.into(), "image/jpeg".into(), vec![1])
    }

    #[test]
    fn next_merges_fields_and_advances() {
        let drafts = DraftStore::new();
        let id = Uuid::new_v4();
        apply_step(&drafts, id, &step_form(StepAction::Next, &[("fullname", "An")]));
        let draft = drafts.load(Some(id));
        assert_eq!(draft.step, WizardStep::Contact);
        assert_eq!(draft.form.get("fullname"), "An");
    }

    #[test]
    fn staging_beyond_cap_drops_extras() {
        let drafts = DraftStore::new();
        let id = Uuid::new_v4();
        let store = NotificationStore::new();
        stage_images(&drafts, id, vec![image("a"), image("b")], 0, &store);
        let admitted = stage_images(
            &drafts,
            id,
            (0..6).map(|i| image(&i.to_string())).collect(),
            0,
            &store,
        );
        assert_eq!(admitted, 3);
        assert_eq!(remaining_slots(&drafts, id), 0);
        assert!(store.take().is_none());
    }

    #[test]
    fn non_images_are_counted_as_rejected() {
        let files = vec![PickedFile {
            file_name: "note.txt".into(),
            bytes: b"hello".to_vec(),
        }];
        let (images, rejected) = compress_files(files);
        assert!(images.is_empty());
        assert_eq!(rejected, 1);
    }

    #[tokio::test]
    async fn missing_full_name_never_reaches_backend() {
        let mut gateway = MockGateway::new();
        gateway.expect_submit_request().times(0);
        let drafts = DraftStore::new();
        let id = Uuid::new_v4();
        filled(&drafts, id, " ", "0901234567");
        let store = NotificationStore::new();
        assert!(!submit_request(&gateway, &drafts, id, "p1", &store).await);
        assert_eq!(
            store.take().map(|n| n.message).as_deref(),
            Some("Vui lòng nhập Họ & Tên")
        );
    }

    #[tokio::test]
    async fn invalid_phone_never_reaches_backend() {
        let mut gateway = MockGateway::new();
        gateway.expect_submit_request().times(0);
        let drafts = DraftStore::new();
        let id = Uuid::new_v4();
        filled(&drafts, id, "An", "abc");
        let store = NotificationStore::new();
        assert!(!submit_request(&gateway, &drafts, id, "p1", &store).await);
        assert_eq!(
            store.take().map(|n| n.message).as_deref(),
            Some("Số điện thoại không hợp lệ")
        );
    }

    #[tokio::test]
    async fn success_clears_draft() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_submit_request()
            .withf(|submission| {
                submission.product_id.as_str() == "p7"
                    && submission.full_name == "An"
                    && submission.images.len() == 1
                    && submission.images[0].key == "image1"
            })
            .times(1)
            .returning(|_| Ok(()));
        let drafts = DraftStore::new();
        let id = Uuid::new_v4();
        open_wizard(&drafts, id, Some("p7"));
        filled(&drafts, id, "An", "0901234567");
        stage_images(&drafts, id, vec![image("a.jpg")], 0, &NotificationStore::new());
        let store = NotificationStore::new();
        assert!(submit_request(&gateway, &drafts, id, "p1", &store).await);
        assert_eq!(store.take().map(|n| n.kind), Some(NotificationKind::Success));
        assert_eq!(drafts.load(Some(id)).form.get("fullname"), "");
    }

    #[tokio::test]
    async fn failure_keeps_draft_and_prefixes_message() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_submit_request()
            .returning(|_| Err(GatewayError::server(500, "Lỗi máy chủ")));
        let drafts = DraftStore::new();
        let id = Uuid::new_v4();
        filled(&drafts, id, "An", "0901234567");
        let store = NotificationStore::new();
        assert!(!submit_request(&gateway, &drafts, id, "p1", &store).await);
        assert_eq!(
            store.take().map(|n| n.message).as_deref(),
            Some("Gửi thất bại: Lỗi máy chủ")
        );
        assert_eq!(drafts.load(Some(id)).form.get("fullname"), "An");
    }

    #[test]
    fn anonymous_visits_store_nothing() {
        let drafts = DraftStore::new();
        for _ in 0..10_000 {
            let id = Uuid::new_v4();
            let page = open_wizard(&drafts, id, None);
            assert_eq!(page.step, 1);
            assert_eq!(remaining_slots(&drafts, id), MAX_STAGED_IMAGES);
            assert!(!remove_image(&drafts, id, "/request/images/x"));
            assert!(staged_image(&drafts, id, Uuid::new_v4()).is_err());
        }
        assert!(drafts.is_empty());
    }
}
