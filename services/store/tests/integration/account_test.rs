use vitrine_auth_types::password::verify_password;
use vitrine_auth_types::totp;
use vitrine_domain::order::OrderStatus;
use vitrine_domain::user::UserRole;
use vitrine_store::error::StoreError;
use vitrine_store::usecase::account::{
    CustomerOrdersUseCase, LoginOutcome, LoginUseCase, ProfileInput, RegisterInput,
    RegisterUseCase, UpdateProfileUseCase,
};
use vitrine_store::usecase::admin_auth::{
    AdminLoginUseCase, BootstrapAdmin, EnsureAdminUseCase, ManageMfaUseCase, VerifyMfaUseCase,
};

use crate::helpers::{
    MockCartStore, MockChallengeStore, MockOrderRepo, MockUserRepo, test_admin, test_customer,
    test_order,
};

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        name: Some("  Bia  ".into()),
        email: email.into(),
        password: "segredo1".into(),
        password_confirmation: "segredo1".into(),
    }
}

/// A code that differs from the current one.
fn wrong_code(secret: &str) -> String {
    let current = totp::current_code(secret).unwrap();
    if current == "000000" {
        "111111".into()
    } else {
        "000000".into()
    }
}

// ── Registration ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_customer_and_report_pending_cart() {
    let users = MockUserRepo::empty();
    let usecase = RegisterUseCase {
        users: users.clone(),
        carts: MockCartStore::with("cart-1", &[("ebook", 1)]),
    };

    let registered = usecase
        .execute(register_input(" Bia@Example.com "), Some("cart-1"))
        .await
        .unwrap();

    assert!(registered.has_cart_items);
    let stored = users.get(registered.user.id).unwrap();
    assert_eq!(stored.email, "bia@example.com");
    assert_eq!(stored.name, "Bia");
    assert_eq!(stored.role, UserRole::Customer);
    assert!(verify_password("segredo1", &stored.password_hash));
}

#[tokio::test]
async fn should_default_name_and_ignore_missing_cart() {
    let usecase = RegisterUseCase {
        users: MockUserRepo::empty(),
        carts: MockCartStore::default(),
    };
    let mut input = register_input("bia@example.com");
    input.name = None;

    let registered = usecase.execute(input, Some("no-such-cart")).await.unwrap();

    assert_eq!(registered.user.name, "Cliente");
    assert!(!registered.has_cart_items);
}

#[tokio::test]
async fn should_reject_taken_email() {
    let usecase = RegisterUseCase {
        users: MockUserRepo::new(vec![test_customer()]),
        carts: MockCartStore::default(),
    };

    let result = usecase
        .execute(register_input("ANA@example.com"), None)
        .await;

    assert!(
        matches!(result, Err(StoreError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_validate_password_rules() {
    let usecase = RegisterUseCase {
        users: MockUserRepo::empty(),
        carts: MockCartStore::default(),
    };

    let mut short = register_input("bia@example.com");
    short.password = "12345".into();
    short.password_confirmation = "12345".into();
    let result = usecase.execute(short, None).await;
    assert!(
        matches!(result, Err(StoreError::Validation(_))),
        "expected Validation, got {result:?}"
    );

    let mut mismatch = register_input("bia@example.com");
    mismatch.password_confirmation = "segredo2".into();
    let result = usecase.execute(mismatch, None).await;
    assert!(
        matches!(result, Err(StoreError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

// ── Customer login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_authenticate_customer() {
    let customer = test_customer();
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![customer.clone()]),
        challenges: MockChallengeStore::default(),
    };

    let outcome = usecase.execute("Ana@Example.com", "s3cret!").await.unwrap();

    assert_eq!(
        outcome,
        LoginOutcome::Authenticated {
            user_id: customer.id,
            role: UserRole::Customer,
        }
    );
}

#[tokio::test]
async fn should_reject_wrong_password_and_unknown_email_alike() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_customer()]),
        challenges: MockChallengeStore::default(),
    };

    for (email, password) in [("ana@example.com", "errada"), ("nobody@example.com", "s3cret!")] {
        let result = usecase.execute(email, password).await;
        assert!(
            matches!(result, Err(StoreError::InvalidCredentials)),
            "expected InvalidCredentials for {email}, got {result:?}"
        );
    }
}

// ── Admin login and MFA ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_refuse_customer_on_admin_login() {
    let usecase = AdminLoginUseCase {
        users: MockUserRepo::new(vec![test_customer()]),
        challenges: MockChallengeStore::default(),
    };

    let result = usecase.execute("ana@example.com", "s3cret!").await;

    assert!(
        matches!(result, Err(StoreError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_challenge_admin_with_mfa_then_accept_valid_code() {
    let secret = totp::generate_secret();
    let mut admin = test_admin();
    admin.mfa_enabled = true;
    admin.mfa_secret = Some(secret.clone());
    let users = MockUserRepo::new(vec![admin.clone()]);
    let challenges = MockChallengeStore::default();

    let outcome = AdminLoginUseCase {
        users: users.clone(),
        challenges: challenges.clone(),
    }
    .execute("admin@example.com", "s3cret!")
    .await
    .unwrap();

    let LoginOutcome::MfaRequired { token } = outcome else {
        panic!("expected MFA challenge, got {outcome:?}");
    };
    assert!(challenges.contains(&token));

    let verify = VerifyMfaUseCase {
        users,
        challenges: challenges.clone(),
    };

    let result = verify.execute(&token, &wrong_code(&secret)).await;
    assert!(
        matches!(result, Err(StoreError::InvalidMfaCode)),
        "expected InvalidMfaCode, got {result:?}"
    );
    assert!(challenges.contains(&token), "wrong code must keep the challenge");

    let code = totp::current_code(&secret).unwrap();
    let user = verify.execute(&token, &code).await.unwrap();
    assert_eq!(user.id, admin.id);
    assert!(!challenges.contains(&token));

    let replay = verify.execute(&token, &code).await;
    assert!(
        matches!(replay, Err(StoreError::MfaChallengeExpired)),
        "expected MfaChallengeExpired, got {replay:?}"
    );
}

#[tokio::test]
async fn should_log_in_admin_without_mfa_directly() {
    let admin = test_admin();
    let outcome = AdminLoginUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
        challenges: MockChallengeStore::default(),
    }
    .execute("admin@example.com", "s3cret!")
    .await
    .unwrap();

    assert_eq!(
        outcome,
        LoginOutcome::Authenticated {
            user_id: admin.id,
            role: UserRole::Admin,
        }
    );
}

#[tokio::test]
async fn should_enable_and_disable_mfa() {
    let admin = test_admin();
    let users = MockUserRepo::new(vec![admin.clone()]);
    let usecase = ManageMfaUseCase {
        users: users.clone(),
        issuer: "Vitrine".into(),
    };

    let setup = usecase.setup(admin.id).await.unwrap();
    assert!(!setup.enabled);
    assert!(setup.otpauth_url.starts_with("otpauth://totp/"));
    assert!(setup.otpauth_url.contains("Vitrine"));

    // A second setup keeps the pending secret.
    let again = usecase.setup(admin.id).await.unwrap();
    assert_eq!(again.secret, setup.secret);

    let result = usecase.enable(admin.id, &wrong_code(&setup.secret)).await;
    assert!(
        matches!(result, Err(StoreError::InvalidMfaCode)),
        "expected InvalidMfaCode, got {result:?}"
    );
    assert!(!users.get(admin.id).unwrap().mfa_enabled);

    let code = totp::current_code(&setup.secret).unwrap();
    usecase.enable(admin.id, &code).await.unwrap();
    let stored = users.get(admin.id).unwrap();
    assert!(stored.mfa_enabled);
    assert_eq!(stored.mfa_secret.as_deref(), Some(setup.secret.as_str()));

    usecase.disable(admin.id).await.unwrap();
    let stored = users.get(admin.id).unwrap();
    assert!(!stored.mfa_enabled);
    assert_eq!(stored.mfa_secret, None);
}

// ── Bootstrap admin ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_configured_admin() {
    let users = MockUserRepo::empty();
    EnsureAdminUseCase {
        users: users.clone(),
    }
    .execute(&BootstrapAdmin {
        email: " Root@Loja.example ".into(),
        password: "troque-me".into(),
    })
    .await
    .unwrap();

    let all = users.users.lock().unwrap().clone();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email, "root@loja.example");
    assert_eq!(all[0].role, UserRole::Admin);
    assert!(verify_password("troque-me", &all[0].password_hash));
}

#[tokio::test]
async fn should_promote_existing_user_keeping_password() {
    let customer = test_customer();
    let users = MockUserRepo::new(vec![customer.clone()]);

    EnsureAdminUseCase {
        users: users.clone(),
    }
    .execute(&BootstrapAdmin {
        email: "ana@example.com".into(),
        password: "outra-senha".into(),
    })
    .await
    .unwrap();

    let stored = users.get(customer.id).unwrap();
    assert_eq!(stored.role, UserRole::Admin);
    assert!(verify_password("s3cret!", &stored.password_hash));
    assert_eq!(users.users.lock().unwrap().len(), 1);
}

// ── Profile and orders ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_profile_and_report_checkout_readiness() {
    let mut customer = test_customer();
    customer.profile = Default::default();
    let users = MockUserRepo::new(vec![customer.clone()]);
    let usecase = UpdateProfileUseCase {
        users: users.clone(),
    };

    let user = usecase
        .execute(
            customer.id,
            ProfileInput {
                full_name: Some(" Ana Maria Souza ".into()),
                cpf: Some("529.982.247-25".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(user.has_checkout_profile());
    let stored = users.get(customer.id).unwrap();
    assert_eq!(stored.profile.full_name.as_deref(), Some("Ana Maria Souza"));
}

#[tokio::test]
async fn should_only_show_own_orders() {
    let customer = test_customer();
    let mut mine = test_order(OrderStatus::Paid, 1_990, Some("ana@example.com"));
    mine.customer_id = Some(customer.id);
    let mut theirs = test_order(OrderStatus::Paid, 5_000, Some("bia@example.com"));
    theirs.customer_id = Some(uuid::Uuid::now_v7());
    let usecase = CustomerOrdersUseCase {
        orders: MockOrderRepo::new(vec![mine.clone(), theirs.clone()]),
    };

    let listed = usecase.list(customer.id, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order.id, mine.id);

    let result = usecase.get(customer.id, theirs.id).await;
    assert!(
        matches!(result, Err(StoreError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}
