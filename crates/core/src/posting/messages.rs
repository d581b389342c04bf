//! Localized entry descriptions and warnings.

use fleetledger_shared::types::Locale;

use super::outcome::ManualEntryReason;
use super::poster::PostingFailure;
use super::roles::{AccountRole, AccountRoleRegistry};

/// Journal entry header description.
#[must_use]
pub fn entry_description(locale: Locale, contract_number: &str) -> String {
    match locale {
        Locale::En => format!("Contract revenue {contract_number}"),
        Locale::Ar => format!("إيرادات العقد رقم {contract_number}"),
    }
}

/// Description of the receivables (debit) line.
#[must_use]
pub fn receivable_line_description(locale: Locale, contract_number: &str) -> String {
    match locale {
        Locale::En => format!("Receivable for contract {contract_number}"),
        Locale::Ar => format!("ذمم مدينة للعقد رقم {contract_number}"),
    }
}

/// Description of the revenue (credit) line.
#[must_use]
pub fn revenue_line_description(locale: Locale, contract_number: &str) -> String {
    match locale {
        Locale::En => format!("Revenue for contract {contract_number}"),
        Locale::Ar => format!("إيراد العقد رقم {contract_number}"),
    }
}

fn role_names(locale: Locale, roles: &[AccountRole]) -> String {
    let separator = match locale {
        Locale::En => ", ",
        Locale::Ar => "، ",
    };
    roles
        .iter()
        .map(|role| {
            let def = AccountRoleRegistry::definition(*role);
            match locale {
                Locale::En => def.name_en,
                Locale::Ar => def.name_ar,
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn failure_warning(locale: Locale, failure: &PostingFailure) -> String {
    match (failure, locale) {
        (PostingFailure::Configuration { missing_roles }, Locale::En) => format!(
            "No ledger account is configured for: {}",
            role_names(locale, missing_roles)
        ),
        (PostingFailure::Configuration { missing_roles }, Locale::Ar) => format!(
            "لا يوجد حساب محاسبي مرتبط بـ: {}",
            role_names(locale, missing_roles)
        ),
        (PostingFailure::Unbalanced(_), Locale::En) => {
            "The journal entry was rejected because debits and credits do not balance".to_string()
        }
        (PostingFailure::Unbalanced(_), Locale::Ar) => {
            "تم رفض القيد المحاسبي لعدم توازن المدين والدائن".to_string()
        }
        (PostingFailure::NumberingExhausted { .. }, Locale::En) => {
            "A unique journal entry number could not be allocated".to_string()
        }
        (PostingFailure::NumberingExhausted { .. }, Locale::Ar) => {
            "تعذر توليد رقم فريد للقيد المحاسبي".to_string()
        }
        (PostingFailure::Store(_), Locale::En) => {
            "The journal entry could not be saved".to_string()
        }
        (PostingFailure::Store(_), Locale::Ar) => "تعذر حفظ القيد المحاسبي".to_string(),
    }
}

fn manual_entry_notice(locale: Locale) -> String {
    match locale {
        Locale::En => {
            "The contract was saved as a draft and requires a manual journal entry".to_string()
        }
        Locale::Ar => "تم حفظ العقد كمسودة ويتطلب إنشاء قيد محاسبي يدوياً".to_string(),
    }
}

/// Warnings shown to the user when a contract needs a manual entry.
///
/// The first element explains the cause and the last tells the user what to do.
#[must_use]
pub fn manual_entry_warnings(locale: Locale, reason: &ManualEntryReason) -> Vec<String> {
    let cause = match (reason, locale) {
        (ManualEntryReason::Posting(failure), _) => failure_warning(locale, failure),
        (ManualEntryReason::ReportedByProcedure { message: Some(m) }, _) => m.clone(),
        (ManualEntryReason::ReportedByProcedure { message: None }, Locale::En) => {
            "The journal entry was not created automatically".to_string()
        }
        (ManualEntryReason::ReportedByProcedure { message: None }, Locale::Ar) => {
            "لم يتم إنشاء القيد المحاسبي تلقائياً".to_string()
        }
        (ManualEntryReason::UnverifiedProcedureResult, Locale::En) => {
            "The journal entry reported by the database could not be verified".to_string()
        }
        (ManualEntryReason::UnverifiedProcedureResult, Locale::Ar) => {
            "تعذر التحقق من القيد المحاسبي الذي أبلغت عنه قاعدة البيانات".to_string()
        }
    };
    vec![cause, manual_entry_notice(locale)]
}
