//! View of the loan request wizard.

use serde::Serialize;

use crate::forms::loan_request::{ChoiceOption, InputKind, fields_for};
use crate::wizard::{LoanDraft, MAX_STAGED_IMAGES, WizardStep};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepTab {
    pub ordinal: usize,
    pub title: &'static str,
    pub active: bool,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: InputKind,
    pub options: &'static [ChoiceOption],
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StagedImageView {
    pub preview_url: String,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct LoanWizardData {
    pub step: usize,
    pub title: &'static str,
    pub percent: u8,
    pub color: &'static str,
    pub tabs: Vec<StepTab>,
    pub fields: Vec<FieldView>,
    pub can_go_back: bool,
    pub is_last: bool,
    pub images: Vec<StagedImageView>,
    pub remaining_slots: usize,
    pub max_images: usize,
}

impl LoanWizardData {
    pub fn new(draft: &LoanDraft) -> Self {
        let step = draft.step;
        let tabs = WizardStep::ALL
            .into_iter()
            .map(|tab| StepTab {
                ordinal: tab.ordinal(),
                title: tab.title(),
                active: tab == step,
                done: tab.ordinal() < step.ordinal(),
            })
            .collect();
        let fields = fields_for(step)
            .map(|field| FieldView {
                key: field.key,
                label: field.label,
                placeholder: field.placeholder,
                kind: field.kind,
                options: field.options,
                value: draft.form.get(field.key).to_string(),
            })
            .collect();
        let images = draft
            .images()
            .iter()
            .map(|image| StagedImageView {
                preview_url: image.preview_url(),
                file_name: image.file_name.clone(),
            })
            .collect();
        Self {
            step: step.ordinal(),
            title: step.title(),
            percent: step.percent(),
            color: step.color(),
            tabs,
            fields,
            can_go_back: !step.is_first(),
            is_last: step.is_last(),
            images,
            remaining_slots: draft.remaining_slots(),
            max_images: MAX_STAGED_IMAGES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_shows_personal_fields_only() {
        let draft = LoanDraft::default();
        let data = LoanWizardData::new(&draft);
        assert_eq!(data.step, 1);
        assert!(!data.can_go_back);
        assert!(!data.is_last);
        assert_eq!(data.fields[0].key, "fullname");
        assert!(data.fields.iter().all(|field| field.key != "phone"));
        assert_eq!(data.tabs.iter().filter(|tab| tab.active).count(), 1);
    }

    #[test]
    fn last_step_marks_earlier_tabs_done() {
        let mut draft = LoanDraft::default();
        draft.step = WizardStep::Credit;
        let data = LoanWizardData::new(&draft);
        assert!(data.is_last);
        assert_eq!(data.percent, 100);
        assert_eq!(data.tabs.iter().filter(|tab| tab.done).count(), 3);
        assert_eq!(data.remaining_slots, MAX_STAGED_IMAGES);
    }
}
