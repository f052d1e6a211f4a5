//! Integration tests for service + stores + snapshots + audit log flow

use rust_decimal_macros::dec;
use tempfile::{tempdir, TempDir};

use bankdesk_business::{
    AuthConfig, AuthenticationProvider, BankService, Credentials, DirectoryAuthProvider,
    ErrorKind, LoanRequest, NewAccount,
};
use bankdesk_core::{AccountType, ApprovalOutcome, LoanStatus, Role, Submitter};
use bankdesk_persistence::{LoadWarning, StorageConfig};

fn open(dir: &TempDir) -> BankService {
    BankService::open(StorageConfig::new(dir.path()))
}

fn new_account(acc_no: &str, name: &str, balance: rust_decimal::Decimal) -> NewAccount {
    NewAccount {
        acc_no: acc_no.to_string(),
        name: name.to_string(),
        gender: "F".to_string(),
        mobile: "555".to_string(),
        account_type: AccountType::Savings,
        balance,
    }
}

fn car_loan(applicant: &str) -> LoanRequest {
    LoanRequest {
        applicant_acc_no: applicant.to_string(),
        amount: dec!(1000),
        term_months: 12,
        purpose: "car".to_string(),
    }
}

/// Service with account A1 (Alice, 100.00) created by the admin
fn service_with_alice(dir: &TempDir) -> BankService {
    let mut service = open(dir);
    service
        .create_account(&Role::admin(), new_account("A1", "Alice", dec!(100.0)))
        .unwrap();
    service
}

#[test]
fn test_deposit_then_overdraw_scenario() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let admin = Role::admin();

    assert_eq!(service.deposit(&admin, "A1", dec!(50)).unwrap(), dec!(150.0));

    let err = service.withdraw(&admin, "A1", dec!(200)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    assert_eq!(
        service.find_account(&admin, "A1").unwrap().unwrap().balance,
        dec!(150.0)
    );
}

#[test]
fn test_loan_lifecycle_scenario() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let admin = Role::admin();

    let loan = service.apply_loan(&Role::user("A1"), car_loan("A1")).unwrap();
    assert_eq!(loan.status, LoanStatus::Pending);
    assert_eq!(loan.applied_by, Submitter::User);
    assert_eq!(loan.applied_by_id, "A1");

    let outcome = service.approve_loan(&admin, &loan.loan_id, false).unwrap();
    match outcome {
        ApprovalOutcome::Approved(approved) => assert_eq!(approved.status, LoanStatus::Approved),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let err = service.approve_loan(&admin, &loan.loan_id, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = service.reject_loan(&admin, &loan.loan_id, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_employee_cannot_delete() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);

    let err = service
        .delete_account(&Role::employee("employee1"), "A1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(service.accounts().len(), 1);
    assert!(service.accounts().contains("A1"));
}

#[test]
fn test_duplicate_create_leaves_store_unchanged() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);

    let err = service
        .create_account(&Role::employee("employee1"), new_account("A1", "Mallory", dec!(5)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);

    let accounts = service.list_accounts(&Role::admin()).unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].name, "Alice");
}

#[test]
fn test_user_scoped_to_own_account() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    service
        .create_account(&Role::admin(), new_account("B2", "Bob", dec!(10)))
        .unwrap();
    let alice = Role::user("A1");

    assert!(service.deposit(&alice, "A1", dec!(1)).is_ok());
    assert_eq!(
        service.withdraw(&alice, "B2", dec!(1)).unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
    assert_eq!(
        service.find_account(&alice, "B2").unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
    assert_eq!(
        service.list_accounts(&alice).unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
    assert_eq!(
        service.apply_loan(&alice, car_loan("B2")).unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
    assert_eq!(service.accounts().find("B2").unwrap().balance, dec!(10));
}

#[test]
fn test_employee_may_view_single_account_only() {
    let dir = tempdir().unwrap();
    let service = service_with_alice(&dir);
    let emp = Role::employee("employee1");

    assert!(service.find_account(&emp, "A1").unwrap().is_some());
    assert!(service.find_account(&emp, "ZZ").unwrap().is_none());
    assert_eq!(
        service.list_accounts(&emp).unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
}

#[test]
fn test_loan_visibility_per_role() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    service
        .create_account(&Role::admin(), new_account("B2", "Bob", dec!(10)))
        .unwrap();

    let by_user = service.apply_loan(&Role::user("A1"), car_loan("A1")).unwrap();
    let by_emp1 = service
        .apply_loan(&Role::employee("employee1"), car_loan("B2"))
        .unwrap();
    let by_emp2 = service
        .apply_loan(&Role::employee("employee2"), car_loan("A1"))
        .unwrap();
    let by_admin = service.apply_loan(&Role::admin(), car_loan("B2")).unwrap();
    assert_eq!(by_admin.applied_by, Submitter::Admin);
    assert_eq!(by_admin.applied_by_id, "ADMIN");

    let ids = |role: &Role| -> Vec<String> {
        service
            .list_loans(role)
            .unwrap()
            .into_iter()
            .map(|l| l.loan_id.clone())
            .collect()
    };

    assert_eq!(
        ids(&Role::admin()),
        vec![
            by_user.loan_id.clone(),
            by_emp1.loan_id.clone(),
            by_emp2.loan_id.clone(),
            by_admin.loan_id.clone()
        ]
    );
    assert_eq!(ids(&Role::employee("employee1")), vec![by_emp1.loan_id.clone()]);
    assert_eq!(
        ids(&Role::user("A1")),
        vec![by_user.loan_id.clone(), by_emp2.loan_id.clone()]
    );
    assert_eq!(ids(&Role::user("B2")), vec![by_emp1.loan_id, by_admin.loan_id]);
}

#[test]
fn test_second_approval_needs_confirmation() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let admin = Role::admin();

    let first = service.apply_loan(&admin, car_loan("A1")).unwrap();
    let second = service.apply_loan(&admin, car_loan("A1")).unwrap();
    assert!(service
        .approve_loan(&admin, &first.loan_id, false)
        .unwrap()
        .is_approved());

    let entries_before = service.audit_entries(&admin).unwrap().len();
    match service.approve_loan(&admin, &second.loan_id, false).unwrap() {
        ApprovalOutcome::NeedsConfirmation {
            loan_id,
            applicant,
            existing_approved,
        } => {
            assert_eq!(loan_id, second.loan_id);
            assert_eq!(applicant, "A1");
            assert_eq!(existing_approved, vec![first.loan_id.clone()]);
        }
        other => panic!("expected confirmation request, got {:?}", other),
    }
    assert_eq!(
        service.loans().find(&second.loan_id).unwrap().status,
        LoanStatus::Pending
    );
    assert_eq!(service.audit_entries(&admin).unwrap().len(), entries_before);

    assert!(service
        .approve_loan(&admin, &second.loan_id, true)
        .unwrap()
        .is_approved());
}

#[test]
fn test_reject_with_note() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let loan = service
        .apply_loan(&Role::employee("employee1"), car_loan("A1"))
        .unwrap();

    let rejected = service
        .reject_loan(&Role::admin(), &loan.loan_id, Some("income too low"))
        .unwrap();
    assert_eq!(rejected.status, LoanStatus::Rejected);
    assert_eq!(rejected.purpose, "car | Rejection note: income too low");
}

#[test]
fn test_only_admin_decides_loans() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let loan = service.apply_loan(&Role::user("A1"), car_loan("A1")).unwrap();

    for role in [Role::employee("employee1"), Role::user("A1")] {
        assert_eq!(
            service
                .approve_loan(&role, &loan.loan_id, true)
                .unwrap_err()
                .kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(
            service
                .reject_loan(&role, &loan.loan_id, None)
                .unwrap_err()
                .kind(),
            ErrorKind::PermissionDenied
        );
    }
    assert!(service.loans().find(&loan.loan_id).unwrap().is_pending());
}

#[test]
fn test_loan_validation() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let admin = Role::admin();

    let err = service.apply_loan(&admin, car_loan("ZZ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let mut request = car_loan("A1");
    request.term_months = 0;
    assert_eq!(
        service.apply_loan(&admin, request).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );

    let mut request = car_loan("A1");
    request.amount = dec!(-1);
    assert_eq!(
        service.apply_loan(&admin, request).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );

    assert_eq!(
        service
            .approve_loan(&admin, "LN-MISSING", false)
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
    assert!(service.loans().is_empty());
}

#[test]
fn test_delete_blocked_by_outstanding_loans() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let admin = Role::admin();
    let loan = service.apply_loan(&admin, car_loan("A1")).unwrap();

    let err = service.delete_account(&admin, "A1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(service.accounts().contains("A1"));

    // Rejected loans stay behind as history
    service.reject_loan(&admin, &loan.loan_id, None).unwrap();
    service.delete_account(&admin, "A1").unwrap();
    assert!(!service.accounts().contains("A1"));
    assert_eq!(service.loans().find(&loan.loan_id).unwrap().applicant_acc_no, "A1");

    assert_eq!(
        service.delete_account(&admin, "A1").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_state_survives_restart() {
    let dir = tempdir().unwrap();
    let admin = Role::admin();
    let loan_id;
    {
        let mut service = service_with_alice(&dir);
        service
            .create_account(&admin, new_account("B2", "Bob", dec!(0.125)))
            .unwrap();
        service.deposit(&admin, "A1", dec!(50.05)).unwrap();
        service.withdraw(&admin, "B2", dec!(0.025)).unwrap();
        loan_id = service
            .apply_loan(&Role::user("A1"), car_loan("A1"))
            .unwrap()
            .loan_id;
        service.approve_loan(&admin, &loan_id, false).unwrap();
        service.shutdown().unwrap();
    }

    let service = open(&dir);
    assert!(service.load_warnings().is_empty());

    let accounts = service.list_accounts(&admin).unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].acc_no, "A1");
    assert_eq!(accounts[0].balance, dec!(150.05));
    assert_eq!(accounts[1].balance, dec!(0.100));

    let loan = service.loans().find(&loan_id).unwrap();
    assert_eq!(loan.status, LoanStatus::Approved);
    assert_eq!(loan.amount, dec!(1000));
    assert_eq!(loan.applied_by, Submitter::User);
}

#[test]
fn test_autosave_disabled_needs_explicit_save() {
    let dir = tempdir().unwrap();
    let config = StorageConfig {
        autosave: false,
        ..StorageConfig::new(dir.path())
    };
    let admin = Role::admin();
    {
        let mut service = BankService::open(config.clone());
        service
            .create_account(&admin, new_account("A1", "Alice", dec!(1)))
            .unwrap();
        // Audit is durable even without a snapshot
        assert_eq!(service.audit_entries(&admin).unwrap().len(), 1);
    }
    assert!(BankService::open(config.clone()).accounts().is_empty());

    {
        let mut service = BankService::open(config.clone());
        service
            .create_account(&admin, new_account("A1", "Alice", dec!(1)))
            .unwrap();
        assert_eq!(
            service.save(&Role::employee("employee1")).unwrap_err().kind(),
            ErrorKind::PermissionDenied
        );
        service.save(&admin).unwrap();
    }
    assert_eq!(BankService::open(config).accounts().len(), 1);
}

#[test]
fn test_corrupt_snapshot_degrades_to_empty() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("accounts.json"), "{ not json").unwrap();

    let mut service = open(&dir);
    assert!(service.accounts().is_empty());
    assert!(service
        .load_warnings()
        .iter()
        .any(|w| matches!(w, LoadWarning::Corrupt { .. })));

    // Still fully usable
    service
        .create_account(&Role::admin(), new_account("A1", "Alice", dec!(1)))
        .unwrap();
    assert_eq!(open(&dir).accounts().len(), 1);
}

#[test]
fn test_hand_edited_snapshot_survives_open_and_shutdown() {
    let dir = tempdir().unwrap();
    let accounts_path = dir.path().join("accounts.json");
    // Hand edit left a trailing comma behind
    let original = r#"{
  "version": 1,
  "saved_at": "2026-01-01T00:00:00Z",
  "records": [
    {"acc_no": "A1", "name": "Alice", "gender": "F", "mobile": "555",
     "type": "Savings", "balance": "100.00"},
  ]
}
"#;
    std::fs::write(&accounts_path, original).unwrap();

    let service = open(&dir);
    let backup = service
        .load_warnings()
        .iter()
        .find_map(|w| match w {
            LoadWarning::Corrupt { backup, .. } => backup.clone(),
            _ => None,
        })
        .expect("corrupt snapshot should have been moved aside");
    service.audit_entries(&Role::admin()).unwrap();
    service.shutdown().unwrap();

    assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);
    assert_ne!(std::fs::read_to_string(&accounts_path).unwrap(), original);
}

#[test]
fn test_deposit_overflow_is_rejected() {
    let dir = tempdir().unwrap();
    let mut service = open(&dir);
    let admin = Role::admin();
    service
        .create_account(&admin, new_account("A1", "Alice", rust_decimal::Decimal::MAX))
        .unwrap();
    let audit_len = service.audit_entries(&admin).unwrap().len();

    let err = service.deposit(&admin, "A1", dec!(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(
        service.find_account(&admin, "A1").unwrap().unwrap().balance,
        rust_decimal::Decimal::MAX
    );
    assert_eq!(service.audit_entries(&admin).unwrap().len(), audit_len);
}

#[test]
fn test_save_failure_keeps_memory_state() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocked");
    std::fs::write(&blocker, "a regular file").unwrap();

    let mut service = BankService::open(StorageConfig::new(&blocker));
    let err = service
        .create_account(&Role::admin(), new_account("A1", "Alice", dec!(1)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    assert!(service.accounts().contains("A1"));
}

#[test]
fn test_audit_log_admin_only_and_clear() {
    let dir = tempdir().unwrap();
    let mut service = service_with_alice(&dir);
    let admin = Role::admin();
    service.deposit(&admin, "A1", dec!(1)).unwrap();

    let emp = Role::employee("employee1");
    assert_eq!(
        service.audit_entries(&emp).unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
    assert_eq!(
        service.clear_audit(&emp).unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
    assert_eq!(service.audit_entries(&admin).unwrap().len(), 2);

    service.clear_audit(&admin).unwrap();
    assert!(service.audit_entries(&admin).unwrap().is_empty());
    assert!(service.accounts().contains("A1"));
}

#[test]
fn test_login_against_loaded_accounts() {
    let dir = tempdir().unwrap();
    service_with_alice(&dir);

    let service = open(&dir);
    let config = AuthConfig::default();
    let provider = DirectoryAuthProvider::new(&config, service.accounts());

    let role = provider
        .verify(&Credentials::User {
            account_no: "A1".into(),
        })
        .unwrap();
    assert_eq!(role, Role::user("A1"));
    assert!(service.find_account(&role, "A1").unwrap().is_some());

    assert!(provider
        .verify(&Credentials::User {
            account_no: "B2".into()
        })
        .is_err());
}
