//! Suites against a mock VetBuddy deployment.

use serde_json::{json, Value};
use vetbuddy_core::{ALL_AUTOMATION_KEYS, STARTER_AUTOMATIONS};
use vetbuddy_smoke::config::DEFAULT_OWNER_EMAIL;
use vetbuddy_smoke::fixtures;
use vetbuddy_smoke::suites::{
    AppointmentsSuite, AuthSuite, AutomationsSuite, ChatSuite, CleanupSuite, DocumentsSuite,
    HealthSuite, ImportSuite, InvoicesSuite, PaymentsSuite, PetsSuite, PublicSuite,
    ServicesSuite, StaffSuite,
};
use vetbuddy_smoke::{CheckResult, Context, Outcome, Runner, SmokeConfig, Suite};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn context(server: &MockServer) -> Context {
    let config = SmokeConfig {
        base_url: server.uri(),
        origin_url: server.uri(),
        ..SmokeConfig::default()
    };
    Context::new(config).expect("valid config")
}

fn find<'a>(results: &'a [CheckResult], name: &str) -> &'a Outcome {
    &results
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no check named {name}"))
        .outcome
}

fn assert_all_passed(results: &[CheckResult]) {
    for result in results {
        assert_eq!(
            result.outcome,
            Outcome::Passed,
            "{} did not pass",
            result.name
        );
    }
}

async fn mount_clinic_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "clinic-token",
            "user": { "id": "clinic-1", "role": "clinic", "email": "demo@vetbuddy.it" }
        })))
        .mount(server)
        .await;
}

async fn mount_owner_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_string_contains(DEFAULT_OWNER_EMAIL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "owner-token",
            "user": { "id": "owner-1", "role": "owner", "email": DEFAULT_OWNER_EMAIL }
        })))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Answers with the request body plus an `id`, like the create endpoints.
fn echo_with_id(id: &'static str) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync {
    move |request: &Request| {
        let mut record: Value = request.body_json().unwrap();
        record["id"] = Value::String(id.to_string());
        ResponseTemplate::new(201).set_body_json(record)
    }
}

#[tokio::test]
async fn health_suite_passes_on_healthy_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ok", "app": "VetBuddy API" })),
        )
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = HealthSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 1);
    assert_all_passed(&results);
}

#[tokio::test]
async fn health_suite_fails_on_wrong_app() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "app": "Other" })),
        )
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = HealthSuite.run(&mut ctx).await;
    assert!(results[0].outcome.is_failed());
}

#[tokio::test]
async fn auth_suite_covers_registration_and_rejections() {
    let server = MockServer::start().await;
    let auth_body = json!({
        "token": "fresh-token",
        "user": { "id": "clinic-new", "role": "clinic" }
    });

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_string_contains("WrongPassword1!"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Credenziali non valide" })),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "demo@vetbuddy.it" })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Email e password richiesti" })),
        )
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "clinic-new", "role": "clinic" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Non autorizzato" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = AuthSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 7);
    assert_all_passed(&results);
    assert!(ctx.fixtures.registered_email.is_some());
}

#[tokio::test]
async fn auth_suite_fails_when_bad_credentials_are_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t",
            "user": { "id": "u", "role": "clinic" }
        })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = AuthSuite.run(&mut ctx).await;
    assert!(find(&results, "bad credentials rejected").is_failed());
    assert!(find(&results, "login registered clinic").is_skipped());
}

fn checkout_session() -> Value {
    json!({
        "url": "https://checkout.stripe.com/c/pay/cs_test_abc",
        "sessionId": "cs_test_abc",
        "amount": 50.0,
        "description": "Visita di controllo"
    })
}

#[tokio::test]
async fn payments_suite_validates_checkout_and_errors() {
    let server = MockServer::start().await;
    let appointment = "ec9673c0-9b83-4160-a381-eb9174604700";

    Mock::given(method("POST"))
        .and(path("/api/payments/appointment"))
        .and(body_string_contains("00000000-0000-0000-0000-000000000000"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Appuntamento non trovato" })),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/appointment"))
        .and(body_string_contains(appointment))
        .respond_with(ResponseTemplate::new(200).set_body_json(checkout_session()))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/appointment"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "ID appuntamento mancante" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/appointment"))
        .and(query_param("appointmentId", appointment))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appointmentId": appointment,
            "paymentStatus": "pending"
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/appointment"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "ID appuntamento mancante" })),
        )
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    ctx.config.appointment_id = Some(appointment.to_string());
    let results = PaymentsSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 5);
    assert_all_passed(&results);
    assert!(!ctx.fixtures.payment_appointment_created);
}

#[tokio::test]
async fn payments_suite_creates_appointment_when_configured_one_is_missing() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "apt-new", "price": 50.0 })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/appointment"))
        .and(body_string_contains("apt-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(checkout_session()))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments/appointment"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "Appuntamento non trovato" })),
        )
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    ctx.config.appointment_id = Some("stale-appointment".to_string());
    let results = PaymentsSuite.run(&mut ctx).await;
    assert_eq!(*find(&results, "create checkout session"), Outcome::Passed);
    assert_eq!(ctx.fixtures.payment_appointment_id.as_deref(), Some("apt-new"));
    assert!(ctx.fixtures.payment_appointment_created);
}

#[tokio::test]
async fn payments_suite_rejects_non_stripe_checkout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com/pay",
            "sessionId": "sess_1",
            "amount": 0,
            "description": ""
        })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    ctx.config.appointment_id = Some("apt-1".to_string());
    let results = PaymentsSuite.run(&mut ctx).await;
    let Outcome::Failed(reason) = find(&results, "create checkout session") else {
        panic!("checkout should fail");
    };
    assert!(reason.contains("invalid Stripe checkout URL"));
}

fn product_reply() -> Value {
    json!({
        "success": true,
        "message": "VetBuddy è la piattaforma che aiuta le cliniche veterinarie a gestire appuntamenti e documenti.",
        "sessionId": "test_session_1"
    })
}

#[tokio::test]
async fn chat_suite_checks_reply_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains(r#""messages":"invalid""#))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Messaggi non validi" })),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("Quanto costa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Il piano Starter è gratuito, il piano Pro costa 79€ al mese.",
            "sessionId": "test_session_1"
        })))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_reply()))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = ChatSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 3);
    assert_all_passed(&results);
}

#[tokio::test]
async fn chat_suite_fails_short_replies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Ciao!",
            "sessionId": "test_session_1"
        })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = ChatSuite.run(&mut ctx).await;
    assert!(find(&results, "product question").is_failed());
    assert!(find(&results, "invalid messages rejected").is_failed());
}

#[tokio::test]
async fn chat_suite_requires_session_id() {
    let server = MockServer::start().await;
    let mut reply = product_reply();
    reply.as_object_mut().unwrap().remove("sessionId");
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = ChatSuite.run(&mut ctx).await;
    assert!(find(&results, "product question").is_failed());
}

#[tokio::test]
async fn chat_suite_reports_assistant_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Servizio AI non disponibile"
        })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = ChatSuite.run(&mut ctx).await;
    let Outcome::Failed(reason) = find(&results, "product question") else {
        panic!("product question should fail");
    };
    assert!(reason.contains("Servizio AI non disponibile"));
}

fn invoice(id: &str, status: &str, totals: Value) -> Value {
    json!({ "id": id, "status": status, "invoiceNumber": null, "totals": totals })
}

#[tokio::test]
async fn invoices_suite_checks_totals_numbering_and_exports() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/invoices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "invoices": [], "stats": {} })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/invoices"))
        .and(body_string_contains("Mario Rossi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(invoice(
            "inv-draft",
            "draft",
            json!({ "subtotal": 70.0, "vatRate": 22, "vatAmount": 15.4, "bolloAmount": 0, "total": 85.4 }),
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/invoices"))
        .and(body_string_contains("Giulia Bianchi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(invoice(
            "inv-high",
            "issued",
            json!({ "subtotal": 120.0, "vatRate": 22, "vatAmount": 26.4, "bolloAmount": 2, "total": 148.4 }),
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/invoices"))
        .and(body_string_contains("Test VAT Calculation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(invoice(
            "inv-vat",
            "draft",
            json!({ "subtotal": 100.0, "vatRate": 22, "vatAmount": 22.0, "bolloAmount": 2, "total": 124.0 }),
        )))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/invoices"))
        .and(body_string_contains(r#""status":"issued""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "inv-draft",
            "status": "issued",
            "invoiceNumber": "2026/001",
            "issueDate": "2026-01-15"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/invoices"))
        .and(body_string_contains(r#""status":"paid""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "inv-draft",
            "status": "paid",
            "invoiceNumber": "2026/001",
            "paidDate": "2026-01-16"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/invoices/export"))
        .and(query_param("format", "csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    r#"attachment; filename="fatture_2026-01-16.csv""#,
                )
                .set_body_raw("Numero,Data\n2026/001,2026-01-15\n", "text/csv"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/invoices/export"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "export_date": "2026-01-16T10:00:00Z",
            "clinic": { "name": "Clinica Demo" },
            "fatture": [],
            "totale_fatture": 0,
            "totale_importo": 0
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/invoices/export"))
        .and(query_param("format", "html"))
        .and(query_param("id", "inv-draft"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    "<!DOCTYPE html><html><body><h1>FATTURA</h1><p>VetBuddy</p><p>€ 85,40</p></body></html>",
                    "text/html",
                ),
        )
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = InvoicesSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 10);
    assert_all_passed(&results);
    assert_eq!(ctx.fixtures.invoice_id.as_deref(), Some("inv-draft"));
}

#[tokio::test]
async fn invoices_suite_flags_wrong_vat() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(invoice(
            "inv-bad",
            "draft",
            json!({ "subtotal": 70.0, "vatRate": 22, "vatAmount": 14.0, "bolloAmount": 0, "total": 84.0 }),
        )))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = InvoicesSuite.run(&mut ctx).await;
    let Outcome::Failed(reason) = find(&results, "create draft invoice") else {
        panic!("draft check should fail");
    };
    assert!(reason.contains("vatAmount"));
    assert!(find(&results, "issue invoice").is_skipped());
}

#[tokio::test]
async fn appointments_suite_creates_lists_and_updates() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(echo_with_id("apt-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "id": "apt-1", "petName": "Buddy" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/apt-1"))
        .and(body_json(json!({ "notes": "Aggiornato dallo smoke test" })))
        .respond_with(echo_with_id("apt-1"))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = AppointmentsSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 3);
    assert_all_passed(&results);
    assert_eq!(ctx.fixtures.appointment_id.as_deref(), Some("apt-1"));
}

#[tokio::test]
async fn appointments_suite_flags_unlisted_appointment() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(echo_with_id("apt-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "apt-old" }])))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = AppointmentsSuite.run(&mut ctx).await;
    let Outcome::Failed(reason) = find(&results, "list appointments") else {
        panic!("list should fail");
    };
    assert!(reason.contains("apt-1"));
}

#[tokio::test]
async fn documents_suite_sends_created_document() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/documents"))
        .respond_with(echo_with_id("doc-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/documents/send-email"))
        .and(body_string_contains(r#""documentId":"doc-1""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = DocumentsSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 3);
    assert_all_passed(&results);
    assert_eq!(ctx.fixtures.document_id.as_deref(), Some("doc-1"));
}

#[tokio::test]
async fn documents_suite_skips_email_without_document() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/documents"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Errore interno" })),
        )
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = DocumentsSuite.run(&mut ctx).await;
    assert!(find(&results, "create document").is_failed());
    assert!(find(&results, "send document email").is_skipped());
}

#[tokio::test]
async fn staff_and_services_suites_capture_ids() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/staff"))
        .respond_with(echo_with_id("staff-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/services"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(echo_with_id("svc-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "services": [] })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let runner = Runner::new(vec![Box::new(StaffSuite), Box::new(ServicesSuite)]);
    let report = runner.run(&mut ctx).await;
    assert_eq!(report.results.len(), 4);
    assert_all_passed(&report.results);
    assert_eq!(ctx.fixtures.staff_id.as_deref(), Some("staff-1"));
    assert_eq!(ctx.fixtures.service_id.as_deref(), Some("svc-1"));
}

#[tokio::test]
async fn staff_suite_fails_when_name_is_not_echoed() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/staff"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "staff-1", "name": "Altro" })),
        )
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = StaffSuite.run(&mut ctx).await;
    assert!(find(&results, "create staff member").is_failed());
    assert!(ctx.fixtures.staff_id.is_none());
}

/// A pet carrying every field of the profile update.
fn profiled_pet(id: &str) -> Value {
    let mut pet = serde_json::to_value(fixtures::pet_profile_update("Max", "dog")).unwrap();
    pet["id"] = json!(id);
    pet
}

#[tokio::test]
async fn pets_suite_updates_profiles_and_skips_empty_accounts() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    mount_owner_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/pets"))
        .respond_with(echo_with_id("pet-new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/pets"))
        .and(header("authorization", "Bearer owner-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([profiled_pet("pet-max")])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/pets"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pets": [] })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/pets/pet-max"))
        .and(header("authorization", "Bearer owner-token"))
        .and(body_string_contains("POL-2025-VET001234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profiled_pet("pet-max")))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = PetsSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 4);
    assert_eq!(*find(&results, "create pet"), Outcome::Passed);
    assert_eq!(*find(&results, "list pets"), Outcome::Passed);
    assert_eq!(*find(&results, "owner profile update"), Outcome::Passed);
    assert!(find(&results, "clinic profile update").is_skipped());
    assert_eq!(ctx.fixtures.pet_id.as_deref(), Some("pet-new"));
}

#[tokio::test]
async fn pets_suite_fails_when_update_is_not_persisted() {
    let server = MockServer::start().await;
    mount_owner_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/pets"))
        .and(header("authorization", "Bearer owner-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "pet-max", "name": "Max", "species": "dog" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/pets/pet-max"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profiled_pet("pet-max")))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = PetsSuite.run(&mut ctx).await;
    let Outcome::Failed(reason) = find(&results, "owner profile update") else {
        panic!("owner update should fail");
    };
    assert!(reason.contains("not persisted"));
}

fn automation_settings(reminders: bool) -> Value {
    let mut settings: serde_json::Map<String, Value> = ALL_AUTOMATION_KEYS
        .iter()
        .map(|key| ((*key).to_string(), Value::Bool(true)))
        .collect();
    settings.insert("appointmentReminders".to_string(), Value::Bool(reminders));
    json!({
        "success": true,
        "settings": settings,
        "plan": "enterprise",
        "allowedAutomations": "all",
        "automationsCount": ALL_AUTOMATION_KEYS.len(),
        "starterAutomations": STARTER_AUTOMATIONS
    })
}

async fn mount_settings_access(server: &MockServer) {
    mount_clinic_login(server).await;
    mount_owner_login(server).await;
    Mock::given(method("GET"))
        .and(path("/api/automations/settings"))
        .and(header("authorization", "Bearer owner-token"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": "Accesso negato" })),
        )
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/automations/settings"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Non autorizzato" })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn automations_suite_toggles_and_restores() {
    let server = MockServer::start().await;
    mount_settings_access(&server).await;
    // Settings read before the toggle, then the flipped state.
    Mock::given(method("GET"))
        .and(path("/api/automations/settings"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(automation_settings(true)))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/automations/settings"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(automation_settings(false)))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/automations/settings"))
        .and(body_string_contains("notARealAutomation"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Automazione non valida" })),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    for enabled in [false, true] {
        let toggle = json!({ "key": "appointmentReminders", "enabled": enabled });
        Mock::given(method("POST"))
            .and(path("/api/automations/settings"))
            .and(body_json(toggle.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "key": "appointmentReminders",
                "enabled": enabled
            })))
            .expect(1)
            .with_priority(2)
            .mount(&server)
            .await;
    }
    Mock::given(method("PUT"))
        .and(path("/api/automations/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(automation_settings(false)))
        .expect(1)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = AutomationsSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 6);
    assert_all_passed(&results);
    server.verify().await;
}

#[tokio::test]
async fn automations_suite_restores_after_failed_toggle() {
    let server = MockServer::start().await;
    mount_settings_access(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/automations/settings"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(automation_settings(true)))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/automations/settings"))
        .and(body_string_contains("appointmentReminders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(2)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = AutomationsSuite.run(&mut ctx).await;
    let Outcome::Failed(reason) = find(&results, "toggle automation") else {
        panic!("toggle should fail");
    };
    assert!(reason.contains("toggle not echoed"));
    server.verify().await;
}

#[tokio::test]
async fn automations_suite_flags_plan_mismatch() {
    let server = MockServer::start().await;
    mount_settings_access(&server).await;
    let mut settings = automation_settings(true);
    settings["plan"] = json!("starter");
    Mock::given(method("GET"))
        .and(path("/api/automations/settings"))
        .and(header("authorization", "Bearer clinic-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(settings))
        .with_priority(1)
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = AutomationsSuite.run(&mut ctx).await;
    assert_eq!(*find(&results, "settings require a token"), Outcome::Passed);
    assert_eq!(*find(&results, "owners are forbidden"), Outcome::Passed);
    let Outcome::Failed(reason) = find(&results, "clinic settings") else {
        panic!("clinic settings should fail");
    };
    assert!(reason.contains("allowedAutomations"));
}

async fn mount_import_endpoints(server: &MockServer, imported: Value) {
    mount_clinic_login(server).await;
    Mock::given(method("GET"))
        .and(path("/api/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "requiredColumns": ["nome", "specie"],
            "optionalColumns": ["razza", "data_nascita", "microchip"]
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/import"))
        .and(header("authorization", "Bearer clinic-token"))
        .and(body_string_contains("nome,specie"))
        .and(body_string_contains("name=\"type\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(imported))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/import"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Non autorizzato" })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn import_suite_uploads_patients() {
    let server = MockServer::start().await;
    mount_import_endpoints(
        &server,
        json!({
            "success": true,
            "imported": { "owners": 1, "pets": 2, "vaccines": 1, "documents": 0 },
            "errors": [],
            "warnings": []
        }),
    )
    .await;

    let mut ctx = context(&server);
    let results = ImportSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 3);
    assert_all_passed(&results);
}

#[tokio::test]
async fn import_suite_fails_when_nothing_is_imported() {
    let server = MockServer::start().await;
    mount_import_endpoints(
        &server,
        json!({
            "success": true,
            "imported": { "owners": 0, "pets": 0, "vaccines": 0, "documents": 0 },
            "errors": ["Riga 2: specie non valida"],
            "warnings": []
        }),
    )
    .await;

    let mut ctx = context(&server);
    let results = ImportSuite.run(&mut ctx).await;
    let Outcome::Failed(reason) = find(&results, "csv upload") else {
        panic!("upload should fail");
    };
    assert!(reason.contains("no pets imported"));
}

#[tokio::test]
async fn public_suite_covers_directory_and_demo_logins() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    mount_owner_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "categories": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services/flat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "visita_clinica", "name": "Visita clinica" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/invite-clinic"))
        .and(body_string_contains("Clinica Test Milano"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    for (key, value) in [("city", "Milano"), ("service", "visita_clinica")] {
        Mock::given(method("GET"))
            .and(path("/api/clinics/search"))
            .and(query_param(key, value))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "clinics": [] })))
            .expect(1)
            .with_priority(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/clinics/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "clinics": [] })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    let results = PublicSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 8);
    assert_all_passed(&results);
    server.verify().await;
}

#[tokio::test]
async fn public_suite_flags_wrong_demo_role() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;

    let mut ctx = context(&server);
    let results = PublicSuite.run(&mut ctx).await;
    assert_eq!(*find(&results, "demo clinic login"), Outcome::Passed);
    let Outcome::Failed(reason) = find(&results, "demo owner login") else {
        panic!("owner login should fail");
    };
    assert!(reason.contains(DEFAULT_OWNER_EMAIL));
}

#[tokio::test]
async fn cleanup_deletes_created_records() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    for record in [
        "appointments/apt-1",
        "appointments/apt-pay",
        "documents/doc-1",
        "staff/staff-1",
        "pets/pet-1",
    ] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/{record}")))
            .and(header("authorization", "Bearer clinic-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut ctx = context(&server);
    ctx.fixtures.appointment_id = Some("apt-1".to_string());
    ctx.fixtures.payment_appointment_id = Some("apt-pay".to_string());
    ctx.fixtures.payment_appointment_created = true;
    ctx.fixtures.document_id = Some("doc-1".to_string());
    ctx.fixtures.staff_id = Some("staff-1".to_string());
    ctx.fixtures.pet_id = Some("pet-1".to_string());

    let results = CleanupSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 5);
    assert_all_passed(&results);
    server.verify().await;
}

#[tokio::test]
async fn cleanup_keeps_configured_checkout_appointment() {
    let server = MockServer::start().await;
    mount_clinic_login(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/pets/pet-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let mut ctx = context(&server);
    ctx.fixtures.payment_appointment_id = Some("apt-configured".to_string());
    ctx.fixtures.pet_id = Some("pet-1".to_string());

    let results = CleanupSuite.run(&mut ctx).await;
    assert!(find(&results, "delete checkout appointment").is_skipped());
    assert!(find(&results, "delete pet").is_failed());
}

#[tokio::test]
async fn cleanup_skips_when_nothing_was_created() {
    let server = MockServer::start().await;
    let mut ctx = context(&server);
    let results = CleanupSuite.run(&mut ctx).await;
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r.outcome.is_skipped()));
}

#[tokio::test]
async fn unreachable_server_fails_checks_without_aborting() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let mut ctx = Context::new(SmokeConfig {
        origin_url: base_url.clone(),
        base_url,
        ..SmokeConfig::default()
    })
    .unwrap();

    let runner = Runner::new(vec![Box::new(HealthSuite), Box::new(ChatSuite)]);
    let report = runner.run(&mut ctx).await;
    assert_eq!(report.results.len(), 4);
    assert!(!report.is_success());
    assert_eq!(report.tally().failed, 4);
}
