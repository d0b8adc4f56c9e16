use super::*;
use crate::dispatch::Engine;
use crate::resolver;
use async_trait::async_trait;
use quipu_core::config::DatabaseConfig;
use quipu_core::domain::{Category, Currency, Language};
use quipu_core::error::QuipuError;
use quipu_core::traits::{RateSource, WelcomeDelivery};
use quipu_rates::Converter;
use quipu_store::Store;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a temporary on-disk store for testing (unique per call).
async fn test_store() -> Store {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir =
        std::env::temp_dir().join(format!("__quipu_cmd_test_{}_{}__", std::process::id(), id));
    let _ = std::fs::create_dir_all(&dir);
    let db_path = dir.join("test.db").to_string_lossy().to_string();
    let _ = std::fs::remove_file(&db_path);
    Store::new(&DatabaseConfig { db_path }).await.unwrap()
}

/// Rate source returning a fixed rate, counting lookups.
struct FixedRate {
    rate: f64,
    calls: AtomicUsize,
}

#[async_trait]
impl RateSource for FixedRate {
    async fn lookup_rate(&self, _base: &str, _target: &str) -> Result<f64, QuipuError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.rate)
    }
}

/// Delivery double that records sends and can be told to fail.
struct FakeDelivery {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl FakeDelivery {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl WelcomeDelivery for FakeDelivery {
    async fn send_welcome(&self, to: &str, body: &str) -> Result<(), QuipuError> {
        if self.fail {
            return Err(QuipuError::Delivery("platform rejected message".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

struct Harness {
    engine: Engine,
    store: Store,
    rates: Arc<FixedRate>,
    delivery: Arc<FakeDelivery>,
}

async fn harness(rate: f64, delivery_fails: bool) -> Harness {
    let store = test_store().await;
    let rates = Arc::new(FixedRate {
        rate,
        calls: AtomicUsize::new(0),
    });
    let delivery = FakeDelivery::new(delivery_fails);
    let converter = Converter::new(rates.clone(), 4700.0);
    let engine = Engine::new(store.clone(), converter, delivery.clone(), 0);
    Harness {
        engine,
        store,
        rates,
        delivery,
    }
}

const ADMIN: &str = "+573001112233";

/// Register an organization with `ADMIN` as its admin.
async fn setup_org(h: &Harness, language: &str, currency: &str) {
    let reply = h
        .engine
        .handle_message(ADMIN, &format!("org {language} {currency} My Home"))
        .await;
    assert!(reply.contains("My Home"), "unexpected reply: {reply}");
}

async fn org_id(h: &Harness) -> String {
    let user = h.store.find_user_by_phone(ADMIN).await.unwrap().unwrap();
    user.organization_id
}

// --- Pattern matching ---

#[test]
fn test_patterns_are_disjoint() {
    let bodies = [
        "help",
        "report",
        "ess 1 x",
        "non 1 x",
        "inc 1 x",
        "ess-usd 1 x",
        "ESS-EUR 20 taxi",
        "org en cop Home",
        "name Ana",
        "add +1234",
        "helpme",
        "essx 1 x",
        "ess- 1 x",
        "ess-usdd 1 x",
        "report now",
        "",
        "   ",
    ];
    for body in bodies {
        let matching = DISPATCH_ORDER
            .iter()
            .filter(|cmd| cmd.matches(body))
            .count();
        assert!(matching <= 1, "{body:?} matched {matching} commands");
    }
}

#[test]
fn test_first_match_per_command() {
    assert_eq!(Command::first_match("help"), Some(Command::Help));
    assert_eq!(Command::first_match("HELP"), Some(Command::Help));
    assert_eq!(Command::first_match("report"), Some(Command::Report));
    assert_eq!(
        Command::first_match("ess 10 food"),
        Some(Command::Record(Category::Essential))
    );
    assert_eq!(
        Command::first_match("non-usd 5 bar"),
        Some(Command::Record(Category::NonEssential))
    );
    assert_eq!(
        Command::first_match("Inc-EUR 5 pay"),
        Some(Command::Record(Category::Income))
    );
    assert_eq!(Command::first_match("org en cop X"), Some(Command::Configure));
    assert_eq!(Command::first_match("name Ana"), Some(Command::SetName));
    assert_eq!(Command::first_match("add +1"), Some(Command::AddUser));
    assert_eq!(Command::first_match("foobar"), None);
    assert_eq!(Command::first_match("ess-us 1 x"), None);
    assert_eq!(Command::first_match(""), None);
}

// --- Configure ---

#[tokio::test]
async fn test_configure_then_resolve_returns_admin() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let (user, org) = resolver::resolve(&h.store, ADMIN).await.unwrap().unwrap();
    assert!(user.is_admin);
    assert_eq!(user.phone, ADMIN);
    assert_eq!(org.name, "My Home");
    assert_eq!(org.language, Language::En);
    assert_eq!(org.currency, Currency::Cop);
}

#[tokio::test]
async fn test_configure_update_by_admin() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "org es usd Casa Nueva").await;
    assert!(reply.contains("Casa Nueva"), "unexpected reply: {reply}");
    assert!(reply.contains("actualizada"), "reply not in new language: {reply}");

    let (_, org) = resolver::resolve(&h.store, ADMIN).await.unwrap().unwrap();
    assert_eq!(org.name, "Casa Nueva");
    assert_eq!(org.language, Language::Es);
    assert_eq!(org.currency, Currency::Usd);
}

#[tokio::test]
async fn test_configure_update_by_non_admin_rejected() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;
    h.engine.handle_message(ADMIN, "add +5551234").await;

    let reply = h.engine.handle_message("+5551234", "org en usd Mine").await;
    assert!(reply.contains("admin"), "unexpected reply: {reply}");

    // Unchanged.
    let (_, org) = resolver::resolve(&h.store, ADMIN).await.unwrap().unwrap();
    assert_eq!(org.name, "My Home");
    assert_eq!(org.currency, Currency::Cop);
}

#[tokio::test]
async fn test_configure_validation_errors() {
    let h = harness(4000.0, false).await;

    let reply = h.engine.handle_message(ADMIN, "org en cop").await;
    assert!(reply.contains("language, a currency, and a name"), "{reply}");

    let reply = h.engine.handle_message(ADMIN, "org pt cop Home").await;
    assert!(reply.contains("\"pt\""), "{reply}");

    // Language parsed, so the currency error arrives in Spanish.
    let reply = h.engine.handle_message(ADMIN, "org es gbp Casa").await;
    assert!(reply.contains("\"gbp\""), "{reply}");
    assert!(reply.contains("moneda"), "{reply}");

    // Nothing was created.
    assert!(h.store.find_user_by_phone(ADMIN).await.unwrap().is_none());
}

// --- Record ---

#[tokio::test]
async fn test_record_essential_same_currency() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "ess 34500 groceries").await;
    assert!(reply.contains("$34,500.00"), "{reply}");
    assert!(reply.contains("groceries"), "{reply}");
    // Same currency: no converted line, no rate lookup.
    assert!(!reply.contains("converted"), "{reply}");
    assert_eq!(h.rates.calls.load(Ordering::Relaxed), 0);

    let txs = h
        .store
        .list_transactions(&org_id(&h).await, chrono::Utc::now() - chrono::Duration::days(1))
        .await
        .unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].category, Category::Essential);
    assert_eq!(txs[0].amount, -34500.0);
    assert_eq!(txs[0].converted, -34500.0);
    assert_eq!(txs[0].currency, "COP");
    assert_eq!(txs[0].description, "groceries");
}

#[tokio::test]
async fn test_record_income_foreign_currency() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "inc-usd 100 salary").await;
    assert!(reply.contains("USD $100.00"), "{reply}");
    assert!(reply.contains("COP $400,000.00"), "{reply}");
    assert_eq!(h.rates.calls.load(Ordering::Relaxed), 1);

    let txs = h
        .store
        .list_transactions(&org_id(&h).await, chrono::Utc::now() - chrono::Duration::days(1))
        .await
        .unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, 100.0);
    assert_eq!(txs[0].currency, "USD");
    assert_eq!(txs[0].converted, 400_000.0);
}

#[tokio::test]
async fn test_record_sign_follows_category() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    h.engine.handle_message(ADMIN, "ess 10 a").await;
    h.engine.handle_message(ADMIN, "non 20 b").await;
    h.engine.handle_message(ADMIN, "inc 30 c").await;

    let txs = h
        .store
        .list_transactions(&org_id(&h).await, chrono::Utc::now() - chrono::Duration::days(1))
        .await
        .unwrap();
    for tx in txs {
        let expected = tx.amount.abs() * tx.category.sense();
        assert_eq!(tx.amount, expected);
        assert_eq!(tx.converted.signum(), tx.amount.signum());
    }
}

#[tokio::test]
async fn test_record_description_keeps_case() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "ESS 10 Lunch at Home").await;
    assert!(reply.contains("Lunch at Home"), "{reply}");
}

#[tokio::test]
async fn test_record_too_few_tokens() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "ess 10").await;
    assert!(reply.contains("at least 2 spaces"), "{reply}");

    let txs = h
        .store
        .list_transactions(&org_id(&h).await, chrono::Utc::now() - chrono::Duration::days(1))
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn test_record_non_numeric_amount() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "ess abc food").await;
    assert!(reply.contains("numerical"), "{reply}");
    assert!(reply.contains("abc"), "{reply}");

    let reply = h.engine.handle_message(ADMIN, "ess inf food").await;
    assert!(reply.contains("numerical"), "{reply}");
}

#[tokio::test]
async fn test_record_zero_or_negative_amount() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "ess 0 food").await;
    assert!(reply.contains("greater than 0"), "{reply}");

    // The sign comes from the category, so a user-supplied minus is rejected
    // rather than interpreted.
    let reply = h.engine.handle_message(ADMIN, "ess -5 food").await;
    assert!(reply.contains("greater than 0"), "{reply}");

    let txs = h
        .store
        .list_transactions(&org_id(&h).await, chrono::Utc::now() - chrono::Duration::days(1))
        .await
        .unwrap();
    assert!(txs.is_empty());
}

// --- Report ---

#[tokio::test]
async fn test_report_savings_and_ratios() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    h.engine.handle_message(ADMIN, "inc 1000 salary").await;
    h.engine.handle_message(ADMIN, "ess 300 rent").await;
    h.engine.handle_message(ADMIN, "non 100 snacks").await;

    let reply = h.engine.handle_message(ADMIN, "report").await;
    // savings = 1000 - 400 = 600, ratio floor(600/1000*100) = 60.
    assert!(reply.contains("Savings (60%)"), "{reply}");
    assert!(reply.contains("$600.00"), "{reply}");
    // expenses = 400; essential 75%, non essential 25%.
    assert!(reply.contains("$400.00"), "{reply}");
    assert!(reply.contains("Essential (75%)"), "{reply}");
    assert!(reply.contains("Non essential (25%)"), "{reply}");
    // Income line.
    assert!(reply.contains("$1,000.00"), "{reply}");
}

#[tokio::test]
async fn test_report_top_expenses_sorted_and_capped() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    for i in 1..=12 {
        h.engine
            .handle_message(ADMIN, &format!("ess {i} expense number {i}"))
            .await;
    }

    let reply = h.engine.handle_message(ADMIN, "report").await;
    assert_eq!(reply.matches("🔥").count(), 10, "{reply}");
    // Largest first, smallest two dropped.
    assert!(reply.contains("🔥 1. $12.00"), "{reply}");
    assert!(reply.contains("🔥 10. $3.00"), "{reply}");
    assert!(!reply.contains("$2.00"), "{reply}");
    assert!(!reply.contains("$1.00"), "{reply}");
}

#[tokio::test]
async fn test_report_without_income_has_no_savings() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    h.engine.handle_message(ADMIN, "ess 50 bus").await;

    let reply = h.engine.handle_message(ADMIN, "report").await;
    assert!(!reply.contains("Savings"), "{reply}");
    assert!(reply.contains("Expenses = $50.00"), "{reply}");
}

#[tokio::test]
async fn test_report_localized_in_spanish() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "es", "cop").await;

    h.engine.handle_message(ADMIN, "inc 100 sueldo").await;
    h.engine.handle_message(ADMIN, "ess 40 mercado").await;

    let reply = h.engine.handle_message(ADMIN, "report").await;
    assert!(reply.contains("Ahorros (60%)"), "{reply}");
    assert!(reply.contains("Gastos"), "{reply}");
    assert!(reply.contains("Esencial"), "{reply}");
}

// --- SetName ---

#[tokio::test]
async fn test_set_name() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "name Ana María").await;
    assert!(reply.contains("Ana María"), "{reply}");

    let user = h.store.find_user_by_phone(ADMIN).await.unwrap().unwrap();
    assert_eq!(user.name, "Ana María");
}

#[tokio::test]
async fn test_set_name_missing_argument() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "name").await;
    assert!(reply.contains("needs the new name"), "{reply}");
}

// --- AddUser ---

#[tokio::test]
async fn test_add_user_success_delivers_then_persists() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "es", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "add +5551234").await;
    assert!(reply.contains("+5551234"), "{reply}");

    assert_eq!(h.delivery.sent_count(), 1);
    let (to, body) = h.delivery.sent.lock().unwrap()[0].clone();
    assert_eq!(to, "+5551234");
    // Welcome goes out in the organization's language.
    assert!(body.contains("Bienvenido"), "{body}");

    let invited = h.store.find_user_by_phone("+5551234").await.unwrap().unwrap();
    assert!(!invited.is_admin);
    assert_eq!(invited.organization_id, org_id(&h).await);
}

#[tokio::test]
async fn test_add_user_by_non_admin_never_attempts_delivery() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;
    h.engine.handle_message(ADMIN, "add +5551234").await;
    assert_eq!(h.delivery.sent_count(), 1);

    let reply = h.engine.handle_message("+5551234", "add +1234").await;
    assert!(reply.contains("admin"), "{reply}");
    assert_eq!(h.delivery.sent_count(), 1);
    assert!(h.store.find_user_by_phone("+1234").await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_user_delivery_failure_persists_nothing() {
    let h = harness(4000.0, true).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "add +15551234567").await;
    assert!(reply.contains("could not be delivered"), "{reply}");
    assert!(h
        .store
        .find_user_by_phone("+15551234567")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_add_user_validation() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "add").await;
    assert!(reply.contains("phone number"), "{reply}");

    let reply = h.engine.handle_message(ADMIN, "add 12345").await;
    assert!(reply.contains("\"12345\""), "{reply}");
    assert_eq!(h.delivery.sent_count(), 0);

    // The admin's own number is already taken.
    let reply = h.engine.handle_message(ADMIN, &format!("add {ADMIN}")).await;
    assert!(reply.contains("already belongs"), "{reply}");
    assert_eq!(h.delivery.sent_count(), 0);
}

// --- Help ---

#[tokio::test]
async fn test_help_lists_commands_but_not_itself() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "help").await;
    assert!(reply.contains("```report```"), "{reply}");
    assert!(reply.contains("```ess <value> <description>```"), "{reply}");
    assert!(reply.contains("```non <value> <description>```"), "{reply}");
    assert!(reply.contains("```inc <value> <description>```"), "{reply}");
    assert!(reply.contains("```org"), "{reply}");
    assert!(reply.contains("```name"), "{reply}");
    assert!(reply.contains("```add"), "{reply}");
    // The menu shows the org's settings.
    assert!(reply.contains("My Home"), "{reply}");
    assert!(reply.contains("COP"), "{reply}");
}

// --- Dispatcher fallbacks ---

#[tokio::test]
async fn test_unknown_sender_gets_bilingual_notice() {
    let h = harness(4000.0, false).await;

    let reply = h.engine.handle_message("+000", "report").await;
    assert!(reply.contains("🇬🇧"), "{reply}");
    assert!(reply.contains("🇪🇸"), "{reply}");
    assert!(reply.contains("+000"), "{reply}");
}

#[tokio::test]
async fn test_unsupported_command_for_member() {
    let h = harness(4000.0, false).await;
    setup_org(&h, "en", "cop").await;

    let reply = h.engine.handle_message(ADMIN, "gimme the money").await;
    assert!(reply.contains("is not valid"), "{reply}");
    assert!(reply.contains("gimme the money"), "{reply}");
}

#[tokio::test]
async fn test_out_of_range_utc_offset_falls_back_to_utc() {
    let store = test_store().await;
    let rates = Arc::new(FixedRate {
        rate: 4000.0,
        calls: AtomicUsize::new(0),
    });
    let converter = Converter::new(rates, 4700.0);
    // i32::MAX minutes would overflow the seconds conversion.
    let engine = Engine::new(store, converter, FakeDelivery::new(false), i32::MAX);

    let reply = engine.handle_message("+000", "report").await;
    assert!(reply.contains("🇬🇧"), "{reply}");
}

#[tokio::test]
async fn test_unsupported_command_for_unknown_sender() {
    let h = harness(4000.0, false).await;

    let reply = h.engine.handle_message("+000", "gimme").await;
    // No organization means no language preference: bilingual notice.
    assert!(reply.contains("🇬🇧"), "{reply}");
}
