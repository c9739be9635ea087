use nmdcdb_restore::config::environment::MongoEnv;
use nmdcdb_restore::services::mongodump::{dump, DumpError, DumpPlan, ARCHIVE_NAME};
use std::path::PathBuf;

fn test_env() -> MongoEnv {
    MongoEnv::from_lookup(|key| match key {
        "MONGO_HOST" => Some("mongodb://db1:27017".to_string()),
        "MONGO_USERNAME" => Some("runtime".to_string()),
        "MONGO_PASSWORD" => Some("secret".to_string()),
        "MONGO_DBNAME" => Some("nmdc".to_string()),
        _ => None,
    })
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_plan_excludes_heavy_collections() {
    let plan = DumpPlan::new(
        names(&[
            "study_set",
            "genome_feature_set",
            "biosample_set",
            "functional_annotation_agg",
        ]),
        PathBuf::from("/out").join(ARCHIVE_NAME),
    );

    assert_eq!(plan.included, names(&["biosample_set", "study_set"]));
    assert_eq!(
        plan.excluded,
        names(&["functional_annotation_agg", "genome_feature_set"])
    );
}

#[test]
fn test_plan_reports_all_collections_before_filtering() {
    let plan = DumpPlan::new(
        names(&["study_set", "genome_feature_set", "biosample_set"]),
        PathBuf::from("/out").join(ARCHIVE_NAME),
    );

    assert_eq!(
        plan.all_collections(),
        names(&["biosample_set", "genome_feature_set", "study_set"])
    );
    assert_eq!(plan.all_collections().len(), 3);
    assert_eq!(plan.included.len(), 2);
}

#[test]
fn test_plan_without_heavy_collections_excludes_nothing() {
    let plan = DumpPlan::new(names(&["study_set"]), PathBuf::from("/out/a.gz"));

    assert!(plan.excluded.is_empty());
    let cmd = plan.command(&test_env());
    assert!(!cmd.args.iter().any(|a| a.to_string_lossy().starts_with("--excludeCollection")));
}

#[test]
fn test_dump_command_arguments() {
    let plan = DumpPlan::new(
        names(&["study_set", "genome_feature_set"]),
        PathBuf::from("/out/nmdcdb.test.archive.gz"),
    );
    let cmd = plan.command(&test_env());

    assert_eq!(cmd.program, "mongodump");
    assert_eq!(
        cmd.args,
        vec![
            "--host",
            "db1:27017",
            "-u",
            "runtime",
            "-p",
            "secret",
            "--authenticationDatabase",
            "admin",
            "-d",
            "nmdc",
            "--gzip",
            "--archive=/out/nmdcdb.test.archive.gz",
            "--excludeCollection=genome_feature_set",
        ]
    );
    assert!(!cmd.redacted().contains("secret"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_dump_creates_dir_and_reports_failure() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let script = tmp.path().join("mongodump");
    std::fs::write(&script, "#!/bin/sh\nexit 5\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let archive = tmp.path().join("nmdcdb-mongodump/2024-01-01").join(ARCHIVE_NAME);
    let plan = DumpPlan::new(names(&["study_set"]), archive.clone());
    let cmd = plan.command(&test_env()).with_program(&script);

    let err = dump(&plan, &cmd).await.unwrap_err();
    assert!(archive.parent().unwrap().is_dir());
    assert!(matches!(err, DumpError::Failed { code: 5, .. }));
    assert_eq!(err.exit_code(), 5);
}
