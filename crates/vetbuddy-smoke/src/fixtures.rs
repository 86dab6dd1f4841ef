//! Sample payloads sent by the suites.

use chrono::Utc;
use vetbuddy_client::{
    InviteClinicRequest, NewAppointment, NewDocument, NewInvoice, NewPet, NewService, NewStaff,
    RegisterRequest,
};
use vetbuddy_core::{
    ChatMessage, ChatRequest, InvoiceItem, MedicalEntry, Medication, PatientRow, PetProfileUpdate,
    Role, WeightEntry,
};

/// Password of clinics registered by the harness.
pub const REGISTERED_PASSWORD: &str = "SecurePass123!";

/// Appointment id that never exists.
pub const MISSING_APPOINTMENT_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Fresh clinic registration with a unique email.
#[must_use]
pub fn clinic_registration() -> RegisterRequest {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    RegisterRequest {
        email: format!("smoke-{}@vetbuddy-test.it", &tag[..12]),
        password: REGISTERED_PASSWORD.to_string(),
        name: "Clinica Veterinaria Smoke".to_string(),
        role: Role::Clinic,
        clinic_name: Some("Clinica Smoke Test".to_string()),
        phone: Some("+39 02 1234567".to_string()),
        address: Some("Via Roma 1, 20100 Milano MI".to_string()),
    }
}

/// Routine visit for Buddy.
#[must_use]
pub fn appointment() -> NewAppointment {
    NewAppointment {
        pet_name: Some("Buddy".to_string()),
        owner_name: Some("John Smith".to_string()),
        date: "2025-01-15".to_string(),
        time: "10:30".to_string(),
        reason: "Annual vaccination".to_string(),
        notes: Some("First time visit".to_string()),
        ..NewAppointment::default()
    }
}

/// Priced appointment the payment checks can pay for.
#[must_use]
pub fn payable_appointment() -> NewAppointment {
    let date = (Utc::now() + chrono::Duration::days(7))
        .format("%Y-%m-%d")
        .to_string();
    NewAppointment {
        pet_name: Some("Luna".to_string()),
        owner_name: Some("Anna Bianchi".to_string()),
        date,
        time: "10:00".to_string(),
        reason: "Visita di controllo".to_string(),
        price: Some(50.0),
        duration: Some(30),
        ..NewAppointment::default()
    }
}

/// Vaccination certificate for Buddy.
#[must_use]
pub fn document() -> NewDocument {
    NewDocument {
        name: "Vaccination Certificate".to_string(),
        kind: "vaccination".to_string(),
        content: "Vaccination certificate content for Buddy".to_string(),
        pet_name: "Buddy".to_string(),
    }
}

/// Staff veterinarian.
#[must_use]
pub fn staff_member() -> NewStaff {
    NewStaff {
        name: "Dr. Sarah Johnson".to_string(),
        role: "vet".to_string(),
        email: "sarah.johnson@testclinic.com".to_string(),
        phone: "+1234567891".to_string(),
    }
}

/// Golden retriever.
#[must_use]
pub fn pet() -> NewPet {
    NewPet {
        name: "Buddy".to_string(),
        species: "dog".to_string(),
        breed: "Golden Retriever".to_string(),
        birth_date: "2020-05-15".to_string(),
        weight: "28.5".to_string(),
        notes: "Very friendly dog, loves treats".to_string(),
    }
}

/// Full profile update with insurance, medical and weight history.
#[must_use]
pub fn pet_profile_update(name: &str, species: &str) -> PetProfileUpdate {
    let weights = [
        ("2024-10-01", 24.0),
        ("2024-11-01", 24.8),
        ("2024-12-01", 25.2),
        ("2025-01-01", 25.5),
    ];
    PetProfileUpdate {
        name: name.to_string(),
        species: species.to_string(),
        breed: "Labrador".to_string(),
        birth_date: "2020-03-15".to_string(),
        weight: 25.5,
        notes: "Aggiornato dallo smoke test".to_string(),
        insurance: true,
        insurance_company: "Assicurazioni Animali Italia".to_string(),
        insurance_policy: "POL-2025-VET001234".to_string(),
        chronic_diseases: vec!["Displasia dell'anca".into(), "Allergia alimentare".into()],
        current_conditions: vec!["Controllo displasia".into(), "Dieta ipoallergenica".into()],
        allergies: vec!["Pollo".into(), "Grano".into(), "Polline".into()],
        medications: vec![
            Medication {
                name: "Carprofen".into(),
                dosage: "25mg".into(),
                frequency: "Una volta al giorno".into(),
                start_date: "2025-01-01".into(),
                end_date: Some("2025-02-01".into()),
            },
            Medication {
                name: "Omega-3".into(),
                dosage: "500mg".into(),
                frequency: "Due volte al giorno".into(),
                start_date: "2024-12-01".into(),
                end_date: None,
            },
        ],
        medical_history: vec![
            MedicalEntry {
                date: "2024-12-01".into(),
                description: "Visita di controllo displasia".into(),
                veterinarian: "Dr. Rossi".into(),
                diagnosis: Some("Displasia moderata".into()),
            },
            MedicalEntry {
                date: "2024-10-15".into(),
                description: "Vaccinazione annuale".into(),
                veterinarian: "Dr. Bianchi".into(),
                diagnosis: None,
            },
        ],
        weight_history: weights
            .into_iter()
            .map(|(date, weight)| WeightEntry {
                weight,
                date: date.to_string(),
            })
            .collect(),
    }
}

/// Draft for a visit plus vaccine, below the stamp duty threshold.
#[must_use]
pub fn draft_invoice() -> NewInvoice {
    NewInvoice {
        customer_name: "Mario Rossi".to_string(),
        customer_email: "mario.rossi@email.com".to_string(),
        customer_phone: Some("+39 338 1234567".to_string()),
        customer_address: Some("Via Roma 123, 20100 Milano MI".to_string()),
        customer_cf: Some("RSSMRA80A01F205X".to_string()),
        pet_name: Some("Luna".to_string()),
        items: vec![
            InvoiceItem::new("Visita clinica completa", 1, 45.0),
            InvoiceItem::new("Vaccino antirabbica", 1, 25.0),
        ],
        notes: Some("Controllo di routine per Luna".to_string()),
        is_draft: true,
    }
}

/// Issued surgery invoice above the stamp duty threshold.
#[must_use]
pub fn high_amount_invoice() -> NewInvoice {
    NewInvoice {
        customer_name: "Giulia Bianchi".to_string(),
        customer_email: "giulia.bianchi@email.com".to_string(),
        customer_phone: None,
        customer_address: None,
        customer_cf: Some("BNCGLI85E45H501Z".to_string()),
        pet_name: Some("Max".to_string()),
        items: vec![InvoiceItem::new(
            "Intervento chirurgico - sterilizzazione",
            1,
            120.0,
        )],
        notes: Some("Intervento programmato per Max".to_string()),
        is_draft: false,
    }
}

/// Draft with a round €100 subtotal.
#[must_use]
pub fn vat_invoice() -> NewInvoice {
    NewInvoice {
        customer_name: "Test VAT Calculation".to_string(),
        customer_email: "test@vat.com".to_string(),
        customer_phone: None,
        customer_address: None,
        customer_cf: None,
        pet_name: None,
        items: vec![InvoiceItem::new("Test service for VAT calculation", 1, 100.0)],
        notes: None,
        is_draft: true,
    }
}

/// Abdominal ultrasound for the price list.
#[must_use]
pub fn service() -> NewService {
    NewService {
        name: "Ecografia addominale completa".to_string(),
        description: "Esame ecografico dell'addome per diagnosi patologie interne".to_string(),
        category: "diagnostica".to_string(),
        price: 65.0,
        duration: 30,
        vat_included: true,
    }
}

/// Owner inviting a clinic to the platform.
#[must_use]
pub fn clinic_invite() -> InviteClinicRequest {
    InviteClinicRequest {
        clinic_name: "Clinica Test Milano".to_string(),
        clinic_email: "test@clinicatest.it".to_string(),
        message: "Ciao, sono un tuo cliente!".to_string(),
        inviter_name: "Mario Rossi".to_string(),
        inviter_email: "mario@test.it".to_string(),
    }
}

/// Chat session id unique to this run.
#[must_use]
pub fn chat_session_id() -> String {
    format!(
        "test_session_{}_{}",
        Utc::now().timestamp(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Single question about the product.
#[must_use]
pub fn chat_question() -> ChatRequest {
    ChatRequest {
        messages: vec![ChatMessage::user("Cos'è VetBuddy?")],
        session_id: chat_session_id(),
    }
}

/// Three-turn conversation ending with a pricing question.
#[must_use]
pub fn chat_pricing_conversation() -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage::user("Cos'è VetBuddy?"),
            ChatMessage::assistant(
                "VetBuddy è una piattaforma gestionale per cliniche veterinarie.",
            ),
            ChatMessage::user("Quanto costa?"),
        ],
        session_id: chat_session_id(),
    }
}

/// Two patients, one with owner and vaccine data.
#[must_use]
pub fn import_rows() -> Vec<PatientRow> {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    vec![
        PatientRow {
            breed: Some("Meticcio".into()),
            birth_date: Some("10/04/2021".into()),
            microchip: Some(format!("380{}", &tag[..12])),
            sex: Some("femmina".into()),
            weight: Some("12.5".into()),
            owner_name: Some("Anna Verdi".into()),
            owner_email: Some(format!("anna.verdi.{}@email.com", &tag[..8])),
            owner_phone: Some("+39 333 1112223".into()),
            vaccine: Some("Antirabbica".into()),
            vaccine_date: Some("01/05/2024".into()),
            vaccine_expiry: Some("01/05/2025".into()),
            ..PatientRow::new("Luna", "cane")
        },
        PatientRow {
            breed: Some("Europeo".into()),
            sex: Some("maschio".into()),
            ..PatientRow::new("Micio", "gatto")
        },
    ]
}
