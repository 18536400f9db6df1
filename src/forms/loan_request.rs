//! Public loan request form: field catalogue, draft state and submit checks.

use std::collections::BTreeMap;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::loan_request::{ImageUpload, LoanRequestSubmission, RequestField};
use crate::domain::types::{PhoneNumber, ProductId, TypeConstraintError};
use crate::forms::FormError;
use crate::wizard::WizardStep;

/// Format of `<input type="date">` values.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Format dates are sent to the backend in.
const PAYLOAD_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
    Email,
    Tel,
    Date,
    Radio,
    Select,
    TextArea,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn choice(value: &'static str, label: &'static str) -> ChoiceOption {
    ChoiceOption { value, label }
}

pub const GENDER_OPTIONS: &[ChoiceOption] = &[choice("Nam", "Nam"), choice("Nữ", "Nữ")];

pub const MARITAL_OPTIONS: &[ChoiceOption] = &[
    choice("", "Chọn"),
    choice("Độc thân", "Độc thân"),
    choice("Đã kết hôn", "Đã kết hôn"),
    choice("Đã ly dị", "Đã ly dị"),
];

pub const SALARY_OPTIONS: &[ChoiceOption] = &[
    choice("Không có thu nhập từ lương", "Không có thu nhập từ lương"),
    choice("Chuyển khoản", "Chuyển khoản"),
    choice("Tiền mặt", "Tiền mặt"),
];

pub const MONTH_INCOME_OPTIONS: &[ChoiceOption] = &[
    choice("Dưới 3 triệu", "Dưới 3 triệu"),
    choice("Từ 3 - 5 triệu", "Từ 3 - 5 triệu"),
    choice("Từ 6 - 10 triệu", "Từ 6 - 10 triệu"),
    choice("Từ 11 - 20 triệu", "Từ 11 - 20 triệu"),
    choice("Từ 21 - 50 triệu", "Từ 21 - 50 triệu"),
    choice("Trên 50 triệu", "Trên 50 triệu"),
];

/// One input of the loan form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LoanField {
    /// Key used in the `dataJson` payload.
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: InputKind,
    pub options: &'static [ChoiceOption],
    pub step: WizardStep,
}

const fn field(
    key: &'static str,
    label: &'static str,
    placeholder: &'static str,
    kind: InputKind,
    step: WizardStep,
) -> LoanField {
    LoanField {
        key,
        label,
        placeholder,
        kind,
        options: &[],
        step,
    }
}

const fn choice_field(
    key: &'static str,
    label: &'static str,
    kind: InputKind,
    options: &'static [ChoiceOption],
    step: WizardStep,
) -> LoanField {
    LoanField {
        key,
        label,
        placeholder: "",
        kind,
        options,
        step,
    }
}

use InputKind::*;
use WizardStep::{Contact, Credit, Employment, Personal};

/// Every field of the form, in the order they are sent to the backend.
pub const LOAN_FIELDS: &[LoanField] = &[
    field("fullname", "Họ & Tên", "Nhập họ và tên", Text, Personal),
    field("phone", "Số điện thoại", "Nhập số điện thoại", Tel, Contact),
    field("address", "Địa chỉ", "Số nhà, đường, quận, TP", Text, Contact),
    field(
        "redbookaddress",
        "Địa chỉ sổ đỏ",
        "Số nhà, đường, quận, TP (Địa chỉ trên sổ đỏ)",
        Text,
        Credit,
    ),
    field("birthday", "Ngày sinh", "", Date, Personal),
    field("age", "Tuổi", "Tuổi", Number, Personal),
    choice_field("gender", "Giới tính", Radio, GENDER_OPTIONS, Personal),
    field("cccd", "Căn cước công dân", "CCCD", Text, Personal),
    field("cmnd", "Chứng minh nhân dân", "CMND", Text, Personal),
    field("placeofissue", "Nơi cấp CCCD", "Nơi cấp CCCD", Text, Personal),
    field("dateofissue", "Ngày cấp CCCD", "", Date, Personal),
    field("nationality", "Quốc tịch", "Quốc tịch", Text, Personal),
    choice_field(
        "marialstatus",
        "Tình trạng hôn nhân",
        Select,
        MARITAL_OPTIONS,
        Personal,
    ),
    field("email", "Địa chỉ Email", "Địa chỉ Email", Email, Contact),
    field("companyname", "Tên công ty", "Tên công ty", Text, Employment),
    field("jobtitle", "Vị trí", "Vị trí", Text, Employment),
    field("department", "Phòng ban", "Phòng ban", Text, Employment),
    field(
        "companyphone",
        "Số điện thoại công ty",
        "Số điện thoại công ty",
        Tel,
        Employment,
    ),
    choice_field(
        "salaryincome",
        "Thu nhập từ lương",
        Select,
        SALARY_OPTIONS,
        Employment,
    ),
    choice_field(
        "monthincome",
        "Thu nhập hàng tháng",
        Select,
        MONTH_INCOME_OPTIONS,
        Employment,
    ),
    field("loanpurpose", "Mục đích vay", "Mục đích vay", Text, Credit),
    field(
        "outstandingloansatotherbanks",
        "Dư nợ tại các ngân hàng khác",
        "Dư nợ tại các ngân hàng khác",
        Text,
        Credit,
    ),
    field(
        "loanamountrequested",
        "Số tiền muốn vay",
        "Số tiền muốn vay",
        Text,
        Credit,
    ),
    field("collateral", "Tài sản đảm bảo", "Tài sản đảm bảo", Text, Credit),
    field("loanproducttype", "Loại sản phẩm vay", "", Text, Credit),
    field("otherinfo", "Thông tin khác", "Thông tin khác", TextArea, Credit),
    field("otherincome", "Thu nhập khác", "Thu nhập khác", Text, Employment),
];

/// Catalogue entry for `key`.
pub fn find_field(key: &str) -> Option<&'static LoanField> {
    LOAN_FIELDS.iter().find(|field| field.key == key)
}

/// Fields shown on `step`, in display order.
pub fn fields_for(step: WizardStep) -> impl Iterator<Item = &'static LoanField> {
    LOAN_FIELDS.iter().filter(move |field| field.step == step)
}

/// Values typed so far. Every catalogue key is always present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoanForm {
    values: BTreeMap<&'static str, String>,
}

impl Default for LoanForm {
    fn default() -> Self {
        Self::with_today(Local::now().date_naive())
    }
}

impl LoanForm {
    /// Blank form whose date fields start at `today`.
    pub fn with_today(today: NaiveDate) -> Self {
        let today = today.format(INPUT_DATE_FORMAT).to_string();
        let values = LOAN_FIELDS
            .iter()
            .map(|field| {
                let value = match field.key {
                    "gender" => "Nam".to_string(),
                    "nationality" => "Việt Nam".to_string(),
                    "age" => "0".to_string(),
                    "birthday" | "dateofissue" => today.clone(),
                    _ => field
                        .options
                        .first()
                        .map(|option| option.value.to_string())
                        .unwrap_or_default(),
                };
                (field.key, value)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Shallow-merges posted values; keys outside the catalogue are ignored.
    pub fn merge(&mut self, pairs: &[(String, String)]) {
        for (key, value) in pairs {
            if let Some(field) = find_field(key) {
                self.values.insert(field.key, value.clone());
            }
        }
    }

    /// Submit-time checks, stopping at the first failure.
    pub fn validate(&self) -> Result<PhoneNumber, FormError> {
        if self.get("fullname").trim().is_empty() {
            return Err(FormError::MissingFullName);
        }
        PhoneNumber::new(self.get("phone")).map_err(|err| match err {
            TypeConstraintError::EmptyString => FormError::MissingPhone,
            _ => FormError::InvalidPhone,
        })
    }

    /// `{key, value}` pairs in catalogue order, dates as `dd/mm/yyyy`.
    pub fn payload_fields(&self) -> Vec<RequestField> {
        LOAN_FIELDS
            .iter()
            .map(|field| {
                let raw = self.get(field.key);
                let value = match field.kind {
                    InputKind::Date => payload_date(raw),
                    InputKind::Number => raw.trim().parse::<i64>().unwrap_or(0).to_string(),
                    _ => raw.to_string(),
                };
                RequestField::new(field.key, value)
            })
            .collect()
    }

    /// Validates the form and assembles the submission.
    pub fn into_submission(
        &self,
        product_id: ProductId,
        images: Vec<ImageUpload>,
    ) -> Result<LoanRequestSubmission, FormError> {
        let phone = self.validate()?;
        Ok(LoanRequestSubmission {
            phone,
            full_name: self.get("fullname").trim().to_string(),
            product_id,
            fields: self.payload_fields(),
            images,
        })
    }
}

fn payload_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), INPUT_DATE_FORMAT)
        .map(|date| date.format(PAYLOAD_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

/// Visible fields of the current step plus the navigation button pressed.
#[derive(Debug, Deserialize)]
pub struct LoanStepForm {
    #[serde(default)]
    pub action: StepAction,
    #[serde(flatten)]
    pub values: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    Back,
    #[default]
    Next,
    Submit,
}

impl LoanStepForm {
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[derive(MultipartForm)]
/// Files picked on the credit step. Only as many as there are free slots
/// are staged.
pub struct StageImagesForm {
    #[multipart(limit = "20MB")]
    pub images: Vec<TempFile>,
}

/// Picked file read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl StageImagesForm {
    /// Reads the first `limit` non-empty files; the rest are never read.
    pub fn read_files(self, limit: usize) -> Result<Vec<PickedFile>, FormError> {
        self.images
            .into_iter()
            .filter(|file| file.size > 0)
            .take(limit)
            .map(|file| {
                let bytes =
                    std::fs::read(file.file.path()).map_err(|_| FormError::InvalidUpload)?;
                Ok(PickedFile {
                    file_name: file.file_name.unwrap_or_default(),
                    bytes,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveImageForm {
    pub preview_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LoanForm {
        LoanForm::with_today(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn catalogue_has_every_payload_key_once() {
        assert_eq!(LOAN_FIELDS.len(), 27);
        for field in LOAN_FIELDS {
            assert_eq!(
                LOAN_FIELDS.iter().filter(|f| f.key == field.key).count(),
                1,
                "{} duplicated",
                field.key
            );
        }
        assert!(WizardStep::ALL.iter().all(|step| fields_for(*step).count() > 0));
    }

    #[test]
    fn defaults_are_prefilled() {
        let form = form();
        assert_eq!(form.get("gender"), "Nam");
        assert_eq!(form.get("nationality"), "Việt Nam");
        assert_eq!(form.get("marialstatus"), "");
        assert_eq!(form.get("salaryincome"), "Không có thu nhập từ lương");
        assert_eq!(form.get("monthincome"), "Dưới 3 triệu");
        assert_eq!(form.get("birthday"), "2024-03-09");
    }

    #[test]
    fn merge_keeps_earlier_steps_and_ignores_unknown_keys() {
        let mut form = form();
        form.merge(&pairs(&[("fullname", "Nguyễn Văn A"), ("hacker", "x")]));
        form.merge(&pairs(&[("phone", "0901234567")]));
        assert_eq!(form.get("fullname"), "Nguyễn Văn A");
        assert_eq!(form.get("phone"), "0901234567");
        assert_eq!(form.get("hacker"), "");
    }

    #[test]
    fn validation_reports_first_failure_in_order() {
        let mut form = form();
        assert_eq!(form.validate(), Err(FormError::MissingFullName));
        form.merge(&pairs(&[("fullname", "  An ")]));
        assert_eq!(form.validate(), Err(FormError::MissingPhone));
        form.merge(&pairs(&[("phone", "12ab")]));
        assert_eq!(form.validate(), Err(FormError::InvalidPhone));
        assert_eq!(
            FormError::InvalidPhone.to_string(),
            "Số điện thoại không hợp lệ"
        );
        form.merge(&pairs(&[("phone", "0901 234 567")]));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn submission_formats_dates_and_keeps_order() {
        let mut form = form();
        form.merge(&pairs(&[
            ("fullname", " An "),
            ("phone", "0901234567"),
            ("age", "abc"),
        ]));
        let product = ProductId::new("p-1").unwrap();
        let submission = form.into_submission(product, Vec::new()).unwrap();
        assert_eq!(submission.full_name, "An");
        let keys: Vec<&str> = submission.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys[..5], ["fullname", "phone", "address", "redbookaddress", "birthday"]);
        assert_eq!(keys.last(), Some(&"otherincome"));
        let birthday = &submission.fields[4];
        assert_eq!(birthday.value, "09/03/2024");
        let age = submission.fields.iter().find(|f| f.key == "age").unwrap();
        assert_eq!(age.value, "0");
    }
}
