//! End-to-end lifecycle coverage: init, issue, revoke, verify against
//! a throwaway store per test.

use orecert::{
    issue, revoke, verify, CaError, Config, IssuanceMetadata, Profile, RootIdentity, UsageKind,
};
use std::fs;
use std::path::Path;

fn test_config(base: &Path) -> Config {
    let mut cfg = Config::default();
    cfg.store = Some(base.join("certs"));
    // Ed25519 keeps keygen cheap; RSA is exercised where the test needs it.
    cfg.default_algo = Some("ed25519".into());
    cfg
}

fn profile(cn: &str) -> Profile {
    Profile { cn: cn.into(), ..Profile::default() }
}

#[test]
fn test_init_and_issue_rsa_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(dir.path());
    cfg.default_algo = None; // fall back to rsa/2048

    let root = RootIdentity::init(&cfg).unwrap();
    let issued = issue(
        &cfg,
        &root,
        &Profile { cn: "localhost".into(), san: vec!["DNS:localhost".into()], ..Profile::default() },
        UsageKind::Server,
    )
    .unwrap();

    for path in issued.paths.artifacts() {
        assert!(path.exists(), "missing artifact {}", path.display());
    }

    let meta: IssuanceMetadata =
        serde_json::from_slice(&fs::read(&issued.paths.meta).unwrap()).unwrap();
    assert_eq!(meta.cn, "localhost");
    assert_eq!(meta.usage, "server");
    assert_eq!(meta.algorithm, "RSA-2048");
    assert_eq!(meta.san, vec!["DNS:localhost".to_string()]);
    assert!(!meta.key_encrypted);
    assert!(meta.not_after > meta.not_before);

    // The ledger placeholder is seeded alongside the root.
    assert!(dir.path().join("certs/ca/crl.pem").exists());
}

#[test]
fn test_second_init_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());

    RootIdentity::init(&cfg).unwrap();
    assert!(matches!(RootIdentity::init(&cfg), Err(CaError::CaExists)));
}

#[test]
fn test_duplicate_issue_requires_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();

    let first = issue(&cfg, &root, &profile("dup.test"), UsageKind::Server).unwrap();
    assert!(matches!(
        issue(&cfg, &root, &profile("dup.test"), UsageKind::Server),
        Err(CaError::ArtifactsExist)
    ));

    cfg.overwrite = true;
    let second = issue(&cfg, &root, &profile("dup.test"), UsageKind::Server).unwrap();
    assert_ne!(first.metadata.serial_hex, second.metadata.serial_hex);
    assert_ne!(first.cert_pem, second.cert_pem);
}

#[test]
fn test_revoke_sequence_is_monotonic() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();

    issue(&cfg, &root, &profile("one.test"), UsageKind::Server).unwrap();
    issue(&cfg, &root, &profile("two.test"), UsageKind::Client).unwrap();

    let first = revoke(&cfg, &root, "one.test").unwrap();
    assert_eq!(first.sequence, 1);
    assert_eq!(first.entries, 1);

    let second = revoke(&cfg, &root, "two.test").unwrap();
    assert_eq!(second.sequence, 2);
    assert_eq!(second.entries, 2);
}

#[test]
fn test_revoking_same_cn_twice_appends_twice() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();
    issue(&cfg, &root, &profile("again.test"), UsageKind::Server).unwrap();

    revoke(&cfg, &root, "again.test").unwrap();
    let summary = revoke(&cfg, &root, "again.test").unwrap();
    assert_eq!(summary.sequence, 2);
    assert_eq!(summary.entries, 2);
}

#[test]
fn test_revoke_with_missing_ledger_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();
    issue(&cfg, &root, &profile("gone.test"), UsageKind::Server).unwrap();

    fs::remove_file(dir.path().join("certs/ca/crl.pem")).unwrap();
    assert!(matches!(
        revoke(&cfg, &root, "gone.test"),
        Err(CaError::NotFound { .. })
    ));
}

#[test]
fn test_verify_accepts_fresh_leaf() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();
    issue(&cfg, &root, &profile("ok.test"), UsageKind::Both).unwrap();

    verify(&cfg, &root, "ok.test").unwrap();
}

#[test]
fn test_verify_reports_expiry_before_chain() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();
    let issued = issue(&cfg, &root, &profile("stale.test"), UsageKind::Server).unwrap();

    // Swap in a self-signed cert whose window closed yesterday. It
    // does not chain to the root either, but expiry must win.
    let mut params = rcgen::CertificateParams::new(vec![]).unwrap();
    params
        .distinguished_name
        .push(rcgen::DnType::CommonName, "stale.test");
    params.not_before = time::OffsetDateTime::now_utc() - time::Duration::days(10);
    params.not_after = time::OffsetDateTime::now_utc() - time::Duration::days(1);
    let key = rcgen::KeyPair::generate().unwrap();
    let stale = params.self_signed(&key).unwrap();
    fs::write(&issued.paths.cert, stale.pem()).unwrap();

    assert!(matches!(
        verify(&cfg, &root, "stale.test"),
        Err(CaError::Expired { .. })
    ));
}

#[test]
fn test_verify_rejects_foreign_root() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let cfg_a = test_config(dir_a.path());
    let cfg_b = test_config(dir_b.path());

    let root_a = RootIdentity::init(&cfg_a).unwrap();
    let root_b = RootIdentity::init(&cfg_b).unwrap();
    issue(&cfg_a, &root_a, &profile("cross.test"), UsageKind::Server).unwrap();

    assert!(matches!(
        verify(&cfg_a, &root_b, "cross.test"),
        Err(CaError::ChainInvalid)
    ));
}

#[test]
fn test_verify_ignores_ledger_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();
    issue(&cfg, &root, &profile("revoked.test"), UsageKind::Server).unwrap();
    revoke(&cfg, &root, "revoked.test").unwrap();

    // Revocation and validity are separate judgements.
    verify(&cfg, &root, "revoked.test").unwrap();

    cfg.check_revocation = true;
    assert!(matches!(
        verify(&cfg, &root, "revoked.test"),
        Err(CaError::Revoked { .. })
    ));
}

#[test]
fn test_traversal_cn_is_rejected_without_writes() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let root = RootIdentity::init(&cfg).unwrap();

    for cn in ["", "../escape", "a/b", "a\\b"] {
        assert!(matches!(
            issue(&cfg, &root, &profile(cn), UsageKind::Server),
            Err(CaError::InvalidCn(_))
        ));
        assert!(matches!(
            revoke(&cfg, &root, cn),
            Err(CaError::InvalidCn(_))
        ));
        assert!(matches!(
            verify(&cfg, &root, cn),
            Err(CaError::InvalidCn(_))
        ));
    }

    // Nothing escaped the store root.
    assert!(!dir.path().join("escape").exists());
    let entries: Vec<_> = fs::read_dir(dir.path().join("certs"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, ["ca"]);
}
