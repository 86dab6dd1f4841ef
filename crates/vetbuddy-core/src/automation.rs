//! Automation settings and subscription plan tiers.
//!
//! Each clinic has a boolean switch per automation. Which switches a clinic may
//! actually use depends on its plan: Starter gets five essentials, Pro adds
//! twenty more, Custom and Enterprise get everything.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::CoreError;

/// Every automation key the settings endpoint knows about.
pub const ALL_AUTOMATION_KEYS: [&str; 44] = [
    "appointmentReminders",
    "bookingConfirmation",
    "vaccineRecalls",
    "postVisitFollowup",
    "noShowDetection",
    "waitlistNotification",
    "suggestedSlots",
    "documentReminders",
    "autoTicketAssignment",
    "aiQuickReplies",
    "urgencyNotifications",
    "weeklyReport",
    "petBirthday",
    "reviewRequest",
    "inactiveClientReactivation",
    "antiparasiticReminder",
    "annualCheckup",
    "medicationRefill",
    "weightAlert",
    "dentalHygiene",
    "appointmentConfirmation",
    "labResultsReady",
    "paymentReminder",
    "postSurgeryFollowup",
    "summerHeatAlert",
    "tickSeasonAlert",
    "newYearFireworksAlert",
    "whatsappReminders",
    "smsEmergency",
    "sterilizationReminder",
    "seniorPetCare",
    "microchipCheck",
    "welcomeNewPet",
    "aiLabExplanation",
    "breedRiskAlert",
    "dietSuggestions",
    "loyaltyProgram",
    "referralProgram",
    "holidayClosures",
    "petCondolences",
    "griefFollowup",
    "dailySummary",
    "lowStockAlert",
    "staffBirthday",
];

/// Automations included in the Starter plan.
pub const STARTER_AUTOMATIONS: [&str; 5] = [
    "appointmentReminders",
    "bookingConfirmation",
    "welcomeNewPet",
    "petBirthday",
    "appointmentConfirmation",
];

/// Automations the Pro plan adds on top of Starter.
pub const PRO_EXTRA_AUTOMATIONS: [&str; 20] = [
    "vaccineRecalls",
    "postVisitFollowup",
    "noShowDetection",
    "waitlistNotification",
    "suggestedSlots",
    "documentReminders",
    "autoTicketAssignment",
    "urgencyNotifications",
    "weeklyReport",
    "reviewRequest",
    "inactiveClientReactivation",
    "antiparasiticReminder",
    "annualCheckup",
    "labResultsReady",
    "paymentReminder",
    "postSurgeryFollowup",
    "aiQuickReplies",
    "medicationRefill",
    "weightAlert",
    "dentalHygiene",
];

/// Whether `key` names a known automation.
#[must_use]
pub fn is_known_key(key: &str) -> bool {
    ALL_AUTOMATION_KEYS.contains(&key)
}

/// Clinic subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationPlan {
    /// Free tier.
    Starter,
    /// Paid tier.
    Pro,
    /// Negotiated tier with every automation.
    Custom,
    /// Enterprise tier with every automation.
    Enterprise,
}

impl AutomationPlan {
    /// Map a plan name the way the server does: anything unrecognised is Starter.
    #[must_use]
    pub fn from_wire(name: &str) -> Self {
        name.parse().unwrap_or(Self::Starter)
    }

    /// Whether the plan unlocks every automation.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Custom | Self::Enterprise)
    }

    /// Keys the plan unlocks.
    #[must_use]
    pub fn allowed_keys(&self) -> BTreeSet<&'static str> {
        match self {
            Self::Starter => STARTER_AUTOMATIONS.into_iter().collect(),
            Self::Pro => STARTER_AUTOMATIONS
                .into_iter()
                .chain(PRO_EXTRA_AUTOMATIONS)
                .collect(),
            Self::Custom | Self::Enterprise => ALL_AUTOMATION_KEYS.into_iter().collect(),
        }
    }

    /// `automationsCount` the settings endpoint should report.
    #[must_use]
    pub fn expected_count(&self) -> usize {
        self.allowed_keys().len()
    }
}

impl FromStr for AutomationPlan {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(Self::Starter),
            "pro" => Ok(Self::Pro),
            "custom" => Ok(Self::Custom),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(CoreError::UnknownPlan(other.to_string())),
        }
    }
}

/// Check a `GET /automations/settings` body for internal consistency.
///
/// Returns one message per violated rule; empty means the body is coherent.
#[must_use]
pub fn settings_response_problems(body: &Value) -> Vec<String> {
    let mut problems = Vec::new();

    if body.get("success").and_then(Value::as_bool) != Some(true) {
        problems.push("success is not true".to_string());
    }

    match body.get("settings").and_then(Value::as_object) {
        Some(settings) => {
            for key in ALL_AUTOMATION_KEYS {
                match settings.get(key) {
                    Some(Value::Bool(_)) => {}
                    Some(other) => problems.push(format!("setting {key} is not a boolean: {other}")),
                    None => problems.push(format!("setting {key} missing")),
                }
            }
        }
        None => problems.push("settings object missing".to_string()),
    }

    let Some(plan_name) = body.get("plan").and_then(Value::as_str) else {
        problems.push("plan missing".to_string());
        return problems;
    };
    let plan = AutomationPlan::from_wire(plan_name);

    match body.get("allowedAutomations") {
        Some(Value::String(s)) if s == "all" && plan.is_unlimited() => {}
        Some(Value::Array(keys)) if !plan.is_unlimited() => {
            let reported: BTreeSet<&str> = keys.iter().filter_map(Value::as_str).collect();
            if reported != plan.allowed_keys() {
                problems.push(format!(
                    "allowedAutomations does not match the {plan_name} plan ({} keys reported)",
                    reported.len()
                ));
            }
        }
        other => problems.push(format!(
            "allowedAutomations {} unexpected for plan {plan_name}",
            other.map_or_else(|| "missing".to_string(), Value::to_string)
        )),
    }

    let count = body.get("automationsCount").and_then(Value::as_u64);
    if count != Some(plan.expected_count() as u64) {
        problems.push(format!(
            "automationsCount {count:?} but plan {plan_name} allows {}",
            plan.expected_count()
        ));
    }

    let starter: Option<BTreeSet<&str>> = body
        .get("starterAutomations")
        .and_then(Value::as_array)
        .map(|keys| keys.iter().filter_map(Value::as_str).collect());
    if starter != Some(STARTER_AUTOMATIONS.into_iter().collect()) {
        problems.push("starterAutomations does not list the starter set".to_string());
    }

    problems
}
