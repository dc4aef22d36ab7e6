// =====================================================
// 요청 검증 (선언적 필드 규칙)
// Request validation (declarative field rules)
// =====================================================
// 1단계: 필드 형식 검사 (required / max / integer / min / date) - 여기서 수행
// 2단계: 저장소 규칙 (unique / exists / 입고일 이후) - 서비스에서 수행
//
// 오류 메시지는 사용자에게 그대로 노출되므로 프랑스어로 작성합니다.
// =====================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::domains::stock::models::{
    CreateMaterielRequest, CreateReceptionRequest, MaterielDraft, ReceptionDraft, SortieDraft,
    SortieRequest,
};

pub const BON_MAX_LEN: usize = 20;
pub const CODE_MATERIEL_MAX_LEN: usize = 20;
pub const DESTINATAIRE_MAX_LEN: usize = 150;

/// 필드별 검증 오류 (입력 순서 유지)
/// Field validation errors, kept in the order they were raised
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| *name == field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    /// 첫 번째 오류 메시지 (응답의 "message" 필드)
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .first()
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    /// 필드 순서 재정렬 (목록에 없는 필드는 뒤로, 같은 필드 내 메시지 순서는 유지)
    pub fn order_by(&mut self, order: &[&str]) {
        self.fields.sort_by_key(|(name, _)| {
            order.iter().position(|f| f == name).unwrap_or(order.len())
        });
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

// -----------------------------------------------------
// 출고 (Sortie)
// -----------------------------------------------------

/// 생성/수정에 따라 메시지 문구가 조금씩 다름
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortieMode {
    Create,
    Update,
}

pub struct SortieMessages {
    pub bon_required: &'static str,
    pub bon_max: &'static str,
    pub bon_unique: &'static str,
    pub quantite_min: &'static str,
}

const CREATE_MESSAGES: SortieMessages = SortieMessages {
    bon_required: "Le numéro de bon de sortie est obligatoire.",
    bon_max: "Le numéro de bon de sortie ne doit pas dépasser 20 caractères.",
    bon_unique: "Ce numéro de bon de sortie existe déjà.",
    quantite_min: "La quantité sortante doit être d'au moins 1.",
};

const UPDATE_MESSAGES: SortieMessages = SortieMessages {
    bon_required: "Le bon de sortie est obligatoire.",
    bon_max: "Le bon de sortie ne doit pas dépasser 20 caractères.",
    bon_unique: "Ce bon de sortie existe déjà.",
    quantite_min: "La quantité sortante doit être supérieure ou égale à 1.",
};

impl SortieMode {
    pub fn messages(self) -> &'static SortieMessages {
        match self {
            SortieMode::Create => &CREATE_MESSAGES,
            SortieMode::Update => &UPDATE_MESSAGES,
        }
    }
}

pub const CODE_MATERIEL_REQUIRED: &str = "Le code matériel est obligatoire.";
pub const CODE_MATERIEL_EXISTS: &str =
    "Le code matériel spécifié n'existe pas dans la base de données.";
pub const DATE_SORTIE_AFTER_RECEPTION: &str =
    "La date de sortie ne peut pas être antérieure à la date de réception.";

/// 출고 필드 순서 (오류 응답의 필드 순서)
pub const SORTIE_FIELD_ORDER: [&str; 5] =
    ["BonSortie", "CodeMateriel", "QuantiteSortant", "Destinataire", "DateSortie"];

/// 형식 검사를 통과한 출고 필드 (부분 결과 + 누적 오류)
///
/// 저장소 규칙은 형식이 맞는 필드에 대해서만 이어서 검사하고
/// 같은 `errors` 에 추가합니다.
#[derive(Debug, Clone, Default)]
pub struct SortieFields {
    pub bon_sortie: Option<String>,
    pub code_materiel: Option<String>,
    pub quantite_sortant: Option<i64>,
    pub destinataire: Option<String>,
    pub date_sortie: Option<NaiveDate>,
    pub errors: ValidationErrors,
}

impl SortieFields {
    /// 모든 필드가 유효하면 draft, 아니면 필드 순서대로 정렬된 오류
    pub fn into_draft(self) -> Result<SortieDraft, ValidationErrors> {
        let mut errors = self.errors;
        errors.order_by(&SORTIE_FIELD_ORDER);

        match (
            self.bon_sortie,
            self.code_materiel,
            self.quantite_sortant,
            self.destinataire,
            self.date_sortie,
        ) {
            (Some(bon_sortie), Some(code_materiel), Some(quantite_sortant), Some(destinataire), Some(date_sortie))
                if errors.is_empty() =>
            {
                Ok(SortieDraft {
                    bon_sortie,
                    code_materiel,
                    quantite_sortant,
                    destinataire,
                    date_sortie,
                })
            }
            _ => Err(errors),
        }
    }
}

/// 출고 요청 형식 검사 (부분 결과)
/// Shape-check a sortie payload, keeping whatever fields parsed
pub fn check_sortie(req: &SortieRequest, mode: SortieMode) -> SortieFields {
    let messages = mode.messages();
    let mut errors = ValidationErrors::new();

    let bon_sortie = string_field(
        &mut errors,
        "BonSortie",
        req.bon_sortie.as_ref(),
        messages.bon_required,
        Some((BON_MAX_LEN, messages.bon_max)),
    );

    let code_materiel = string_field(
        &mut errors,
        "CodeMateriel",
        req.code_materiel.as_ref(),
        CODE_MATERIEL_REQUIRED,
        None,
    );

    let quantite_sortant = integer_field(
        &mut errors,
        "QuantiteSortant",
        req.quantite_sortant.as_ref(),
        "La quantité sortante est obligatoire.",
        "La quantité sortante doit être un nombre entier.",
        (1, messages.quantite_min),
    );

    let destinataire = string_field(
        &mut errors,
        "Destinataire",
        req.destinataire.as_ref(),
        "Le destinataire est obligatoire.",
        Some((
            DESTINATAIRE_MAX_LEN,
            "Le destinataire ne doit pas dépasser 150 caractères.",
        )),
    );

    let date_sortie = date_field(
        &mut errors,
        "DateSortie",
        req.date_sortie.as_ref(),
        "La date de sortie est obligatoire.",
        "La date de sortie doit être une date valide.",
    );

    SortieFields {
        bon_sortie,
        code_materiel,
        quantite_sortant,
        destinataire,
        date_sortie,
        errors,
    }
}

/// 출고 요청 형식 검사
/// Shape-check a sortie payload
pub fn sortie_fields(req: &SortieRequest, mode: SortieMode) -> Result<SortieDraft, ValidationErrors> {
    check_sortie(req, mode).into_draft()
}

// -----------------------------------------------------
// 자재 (Materiel)
// -----------------------------------------------------

pub const CODE_MATERIEL_UNIQUE: &str = "Ce code matériel existe déjà.";

pub fn materiel_fields(req: &CreateMaterielRequest) -> Result<MaterielDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let code_materiel = string_field(
        &mut errors,
        "CodeMateriel",
        req.code_materiel.as_ref(),
        CODE_MATERIEL_REQUIRED,
        Some((
            CODE_MATERIEL_MAX_LEN,
            "Le code matériel ne doit pas dépasser 20 caractères.",
        )),
    );

    let quantite = integer_field(
        &mut errors,
        "Quantite",
        req.quantite.as_ref(),
        "La quantité est obligatoire.",
        "La quantité doit être un nombre entier.",
        (0, "La quantité ne peut pas être négative."),
    );

    match (code_materiel, quantite) {
        (Some(code_materiel), Some(quantite)) if errors.is_empty() => Ok(MaterielDraft {
            code_materiel,
            quantite,
        }),
        _ => Err(errors),
    }
}

// -----------------------------------------------------
// 입고 (Reception)
// -----------------------------------------------------

pub const BON_RECEPTION_UNIQUE: &str = "Ce numéro de bon de réception existe déjà.";

pub fn reception_fields(req: &CreateReceptionRequest) -> Result<ReceptionDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let bon_reception = string_field(
        &mut errors,
        "BonReception",
        req.bon_reception.as_ref(),
        "Le numéro de bon de réception est obligatoire.",
        Some((
            BON_MAX_LEN,
            "Le numéro de bon de réception ne doit pas dépasser 20 caractères.",
        )),
    );

    let code_materiel = string_field(
        &mut errors,
        "CodeMateriel",
        req.code_materiel.as_ref(),
        CODE_MATERIEL_REQUIRED,
        None,
    );

    let quantite_recu = integer_field(
        &mut errors,
        "QuantiteRecu",
        req.quantite_recu.as_ref(),
        "La quantité reçue est obligatoire.",
        "La quantité reçue doit être un nombre entier.",
        (1, "La quantité reçue doit être d'au moins 1."),
    );

    let date_reception = date_field(
        &mut errors,
        "DateReception",
        req.date_reception.as_ref(),
        "La date de réception est obligatoire.",
        "La date de réception doit être une date valide.",
    );

    match (bon_reception, code_materiel, quantite_recu, date_reception) {
        (Some(bon_reception), Some(code_materiel), Some(quantite_recu), Some(date_reception))
            if errors.is_empty() =>
        {
            Ok(ReceptionDraft {
                bon_reception,
                code_materiel,
                quantite_recu,
                date_reception,
            })
        }
        _ => Err(errors),
    }
}

// -----------------------------------------------------
// 필드 헬퍼
// -----------------------------------------------------

/// 문자열 필드: 앞뒤 공백 제거, 빈 문자열은 누락으로 취급, 숫자는 문자열로 변환
fn string_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&Value>,
    required: &str,
    max: Option<(usize, &str)>,
) -> Option<String> {
    let text = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            errors.add(field, format!("Le champ {} doit être une chaîne de caractères.", field));
            return None;
        }
    };

    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => {
            errors.add(field, required);
            return None;
        }
    };

    if let Some((limit, message)) = max {
        if text.chars().count() > limit {
            errors.add(field, message);
            return None;
        }
    }

    Some(text)
}

/// 정수 필드: JSON 숫자 또는 숫자 문자열 허용
fn integer_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&Value>,
    required: &str,
    not_integer: &str,
    (min, below_min): (i64, &str),
) -> Option<i64> {
    let parsed = match value {
        None | Some(Value::Null) => {
            errors.add(field, required);
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, required);
            return None;
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15).map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    let Some(number) = parsed else {
        errors.add(field, not_integer);
        return None;
    };

    if number < min {
        errors.add(field, below_min);
        return None;
    }

    Some(number)
}

fn date_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&Value>,
    required: &str,
    invalid: &str,
) -> Option<NaiveDate> {
    let text = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim()),
        Some(_) => {
            errors.add(field, invalid);
            return None;
        }
    };

    let Some(text) = text else {
        errors.add(field, required);
        return None;
    };

    match parse_date(text) {
        Some(date) => Some(date),
        None => {
            errors.add(field, invalid);
            None
        }
    }
}

/// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 를 허용 (날짜 부분만 사용)
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sortie_request(value: Value) -> SortieRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn valid_sortie_payload_produces_a_draft() {
        let req = sortie_request(json!({
            "BonSortie": " BS-001 ",
            "CodeMateriel": "MAT-001",
            "QuantiteSortant": "30",
            "Destinataire": "Atelier",
            "DateSortie": "2024-10-20"
        }));

        let draft = sortie_fields(&req, SortieMode::Create).unwrap();
        assert_eq!(draft.bon_sortie, "BS-001");
        assert_eq!(draft.quantite_sortant, 30);
        assert_eq!(draft.date_sortie, NaiveDate::from_ymd_opt(2024, 10, 20).unwrap());
    }

    #[test]
    fn missing_fields_report_required_messages_in_field_order() {
        let errors = sortie_fields(&sortie_request(json!({})), SortieMode::Create).unwrap_err();

        assert_eq!(
            errors.first_message(),
            Some("Le numéro de bon de sortie est obligatoire.")
        );
        for field in ["BonSortie", "CodeMateriel", "QuantiteSortant", "Destinataire", "DateSortie"] {
            assert!(errors.has(field), "missing error for {}", field);
        }
    }

    #[test]
    fn update_mode_uses_its_own_wording() {
        let req = sortie_request(json!({
            "BonSortie": "BS-001",
            "CodeMateriel": "MAT-001",
            "QuantiteSortant": 0,
            "Destinataire": "Atelier",
            "DateSortie": "2024-10-20"
        }));

        let errors = sortie_fields(&req, SortieMode::Update).unwrap_err();
        assert_eq!(
            errors.messages("QuantiteSortant"),
            ["La quantité sortante doit être supérieure ou égale à 1.".to_string()]
        );
    }

    #[test]
    fn length_integer_and_date_rules() {
        let req = sortie_request(json!({
            "BonSortie": "X".repeat(21),
            "CodeMateriel": "MAT-001",
            "QuantiteSortant": 2.5,
            "Destinataire": "D".repeat(151),
            "DateSortie": "20/10/2024"
        }));

        let errors = sortie_fields(&req, SortieMode::Create).unwrap_err();
        assert_eq!(
            errors.messages("BonSortie"),
            ["Le numéro de bon de sortie ne doit pas dépasser 20 caractères.".to_string()]
        );
        assert_eq!(
            errors.messages("QuantiteSortant"),
            ["La quantité sortante doit être un nombre entier.".to_string()]
        );
        assert!(errors.has("Destinataire"));
        assert_eq!(
            errors.messages("DateSortie"),
            ["La date de sortie doit être une date valide.".to_string()]
        );
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let req = sortie_request(json!({
            "BonSortie": "é".repeat(20),
            "CodeMateriel": "MAT-001",
            "QuantiteSortant": 1,
            "Destinataire": "Atelier",
            "DateSortie": "2024-10-20"
        }));
        assert!(sortie_fields(&req, SortieMode::Create).is_ok());
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 10, 20);
        assert_eq!(parse_date("2024-10-20"), expected);
        assert_eq!(parse_date("2024-10-20 08:30:00"), expected);
        assert_eq!(parse_date("2024-10-20T08:30:00+02:00"), expected);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn materiel_quantity_may_be_zero_but_not_negative() {
        let ok: CreateMaterielRequest =
            serde_json::from_value(json!({ "CodeMateriel": "MAT-001", "Quantite": 0 })).unwrap();
        assert_eq!(materiel_fields(&ok).unwrap().quantite, 0);

        let negative: CreateMaterielRequest =
            serde_json::from_value(json!({ "CodeMateriel": "MAT-001", "Quantite": -1 })).unwrap();
        let errors = materiel_fields(&negative).unwrap_err();
        assert_eq!(
            errors.first_message(),
            Some("La quantité ne peut pas être négative.")
        );
    }

    #[test]
    fn reception_requires_positive_quantity() {
        let req: CreateReceptionRequest = serde_json::from_value(json!({
            "BonReception": "BR-1",
            "CodeMateriel": "MAT-001",
            "QuantiteRecu": 0,
            "DateReception": "2024-10-14"
        }))
        .unwrap();

        let errors = reception_fields(&req).unwrap_err();
        assert!(errors.has("QuantiteRecu"));
    }

    #[test]
    fn partial_fields_keep_valid_values_next_to_errors() {
        let req = sortie_request(json!({
            "BonSortie": "BS-001",
            "CodeMateriel": "MAT-001",
            "QuantiteSortant": 3,
            "DateSortie": "2024-10-20"
        }));

        let fields = check_sortie(&req, SortieMode::Create);
        assert_eq!(fields.bon_sortie.as_deref(), Some("BS-001"));
        assert_eq!(fields.date_sortie, NaiveDate::from_ymd_opt(2024, 10, 20));
        assert!(fields.destinataire.is_none());
        assert!(fields.errors.has("Destinataire"));
    }

    #[test]
    fn late_errors_are_reordered_by_field() {
        let req = sortie_request(json!({ "BonSortie": "BS-001" }));
        let mut fields = check_sortie(&req, SortieMode::Create);
        fields.errors.add("BonSortie", "Ce numéro de bon de sortie existe déjà.");

        let errors = fields.into_draft().unwrap_err();
        assert_eq!(
            errors.first_message(),
            Some("Ce numéro de bon de sortie existe déjà.")
        );
        assert!(errors.has("Destinataire"));
    }

    #[test]
    fn errors_serialize_as_an_ordered_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("BonSortie", "a");
        errors.add("CodeMateriel", "b");
        errors.add("BonSortie", "c");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, json!({ "BonSortie": ["a", "c"], "CodeMateriel": ["b"] }));
    }
}
