//! Server-side state of the multi-step loan request wizard.
//!
//! A browser session owns at most one [`LoanDraft`]. The draft id travels in
//! the session cookie; the draft itself, including staged images, stays in
//! the process-wide [`DraftStore`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use uuid::Uuid;

use crate::domain::loan_request::ImageUpload;
use crate::forms::loan_request::LoanForm;

/// Session key holding the id of the current draft.
pub const DRAFT_SESSION_KEY: &str = "loan_draft";

/// Maximum number of images attached to one request.
pub const MAX_STAGED_IMAGES: usize = 5;

/// Ordered sections of the loan form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Personal,
    Contact,
    Employment,
    Credit,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Personal,
        WizardStep::Contact,
        WizardStep::Employment,
        WizardStep::Credit,
    ];

    /// 1-based position.
    pub const fn ordinal(self) -> usize {
        match self {
            WizardStep::Personal => 1,
            WizardStep::Contact => 2,
            WizardStep::Employment => 3,
            WizardStep::Credit => 4,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal.checked_sub(1)?).copied()
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::Personal => "THÔNG TIN CÁ NHÂN",
            WizardStep::Contact => "THÔNG TIN LIÊN LẠC",
            WizardStep::Employment => "THÔNG TIN VIỆC LÀM",
            WizardStep::Credit => "THÔNG TIN TÍN DỤNG",
        }
    }

    /// Progress bar fill.
    pub const fn percent(self) -> u8 {
        match self {
            WizardStep::Personal => 0,
            WizardStep::Contact => 33,
            WizardStep::Employment => 66,
            WizardStep::Credit => 100,
        }
    }

    /// Progress bar colour.
    pub const fn color(self) -> &'static str {
        match self {
            WizardStep::Personal => "#283678",
            WizardStep::Contact => "#a7ab35",
            WizardStep::Employment => "#56ae76",
            WizardStep::Credit => "#079a52",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() - 1)
    }

    pub fn is_first(self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

/// Compressed image waiting for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedImage {
    /// Random id used in the preview URL.
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl StagedImage {
    pub fn new(file_name: String, content_type: String, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn preview_url(&self) -> String {
        format!("/request/images/{}", self.id)
    }
}

/// Half-filled loan request of one browser session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoanDraft {
    pub step: WizardStep,
    pub form: LoanForm,
    pub product_id: Option<String>,
    images: Vec<StagedImage>,
}

impl LoanDraft {
    pub fn images(&self) -> &[StagedImage] {
        &self.images
    }

    pub fn remaining_slots(&self) -> usize {
        MAX_STAGED_IMAGES.saturating_sub(self.images.len())
    }

    /// Stages as many `images` as there are free slots and returns how many
    /// were admitted. The rest are dropped.
    pub fn stage(&mut self, images: impl IntoIterator<Item = StagedImage>) -> usize {
        let admitted: Vec<StagedImage> = images.into_iter().take(self.remaining_slots()).collect();
        let count = admitted.len();
        self.images.extend(admitted);
        count
    }

    /// Removes the image previewed at `preview_url`.
    pub fn remove_by_preview(&mut self, preview_url: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|image| image.preview_url() != preview_url);
        before != self.images.len()
    }

    pub fn find_image(&self, id: Uuid) -> Option<&StagedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn go_next(&mut self) {
        if let Some(step) = self.step.next() {
            self.step = step;
        }
    }

    pub fn go_back(&mut self) {
        if let Some(step) = self.step.previous() {
            self.step = step;
        }
    }

    /// Staged images as `image1..image5` multipart parts.
    pub fn uploads(&self) -> Vec<ImageUpload> {
        self.images
            .iter()
            .enumerate()
            .map(|(index, image)| ImageUpload {
                key: format!("image{}", index + 1),
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            })
            .collect()
    }
}

/// Drafts idle longer than this are dropped.
pub const DRAFT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Upper bound on drafts held at once; the least recently touched goes first.
pub const MAX_DRAFTS: usize = 500;

#[derive(Debug)]
struct StoredDraft {
    draft: LoanDraft,
    touched: Instant,
    /// Write order, for least-recently-touched eviction.
    stamp: u64,
}

#[derive(Debug, Default)]
struct Drafts {
    entries: HashMap<Uuid, StoredDraft>,
    writes: u64,
}

/// Drafts of all sessions, keyed by the id stored in each session.
///
/// Reads never create a draft. Writes refresh the idle timer, drop expired
/// drafts and keep at most `capacity` entries.
#[derive(Clone, Debug)]
pub struct DraftStore {
    drafts: Arc<Mutex<Drafts>>,
    idle_ttl: Duration,
    capacity: usize,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::with_limits(DRAFT_IDLE_TTL, MAX_DRAFTS)
    }
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, capacity: usize) -> Self {
        Self {
            drafts: Arc::default(),
            idle_ttl,
            capacity: capacity.max(1),
        }
    }

    /// Copy of the draft, or a fresh one when `id` is unknown or expired.
    pub fn load(&self, id: Option<Uuid>) -> LoanDraft {
        let drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        id.and_then(|id| drafts.entries.get(&id))
            .filter(|stored| stored.touched.elapsed() < self.idle_ttl)
            .map(|stored| stored.draft.clone())
            .unwrap_or_default()
    }

    /// Reads a stored draft in place without creating one.
    pub fn inspect<T>(&self, id: Uuid, read: impl FnOnce(&LoanDraft) -> T) -> Option<T> {
        let drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        drafts
            .entries
            .get(&id)
            .filter(|stored| stored.touched.elapsed() < self.idle_ttl)
            .map(|stored| read(&stored.draft))
    }

    /// Applies `change` to the stored draft (creating it when missing) and
    /// returns what `change` returned.
    pub fn update<T>(&self, id: Uuid, change: impl FnOnce(&mut LoanDraft) -> T) -> T {
        let mut guard = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        let drafts = &mut *guard;
        let now = Instant::now();
        drafts
            .entries
            .retain(|_, stored| now.duration_since(stored.touched) < self.idle_ttl);
        if !drafts.entries.contains_key(&id) {
            while drafts.entries.len() >= self.capacity {
                let Some(oldest) = drafts
                    .entries
                    .iter()
                    .min_by_key(|(_, stored)| stored.stamp)
                    .map(|(key, _)| *key)
                else {
                    break;
                };
                log::debug!("Evicting loan draft {oldest}");
                drafts.entries.remove(&oldest);
            }
        }
        drafts.writes += 1;
        let stamp = drafts.writes;
        let stored = drafts.entries.entry(id).or_insert_with(|| StoredDraft {
            draft: LoanDraft::default(),
            touched: now,
            stamp,
        });
        stored.touched = now;
        stored.stamp = stamp;
        change(&mut stored.draft)
    }

    /// Like [`DraftStore::update`] but leaves unknown ids alone.
    pub fn update_existing<T>(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut LoanDraft) -> T,
    ) -> Option<T> {
        let exists = self.inspect(id, |_| ()).is_some();
        exists.then(|| self.update(id, change))
    }

    pub fn len(&self) -> usize {
        self.drafts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self, id: Uuid) {
        let mut drafts = self.drafts.lock().unwrap_or_else(PoisonError::into_inner);
        drafts.entries.remove(&id);
    }
}
