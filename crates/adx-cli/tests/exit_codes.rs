//! Exercises exit-code selection directly against the library entry point,
//! rather than spawning the compiled binary.

use std::sync::atomic::{AtomicU64, Ordering};

use adx_cli::{Cli, ExitStatus};
use clap::Parser;

fn push_unicode(buf: &mut Vec<u8>, s: &str) {
    let units: Vec<u16> = s.encode_utf16().collect();
    buf.extend_from_slice(&(units.len() as u32).to_le_bytes());
    for u in units {
        buf.extend_from_slice(&u.to_le_bytes());
    }
}

fn push_string_attr(record: &mut Vec<u8>, attribute_id: u32, value: &str) {
    record.extend_from_slice(&attribute_id.to_le_bytes());
    record.extend_from_slice(&1u32.to_le_bytes());
    let mut blob = Vec::new();
    for u in value.encode_utf16() {
        blob.extend_from_slice(&u.to_le_bytes());
    }
    record.extend_from_slice(&(blob.len() as u32).to_le_bytes());
    record.extend_from_slice(&blob);
}

/// A single-object, single-attribute snapshot: `objectClass=user` on
/// `CN=Alice,DC=corp,DC=local`.
fn build_fixture() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(adx_codec::SIGNATURE);
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());
    push_unicode(&mut buf, "DC=corp,DC=local");
    buf.extend_from_slice(&1u32.to_le_bytes()); // object_count

    let offsets_pos = buf.len();
    buf.extend_from_slice(&[0u8; 32]);

    let schema_offset = buf.len() as u64;
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_unicode(&mut buf, "objectClass");
    buf.extend_from_slice(&0u32.to_le_bytes()); // syntax = String
    buf.push(0); // multi-valued

    let class_offset = buf.len() as u64;
    buf.extend_from_slice(&0u32.to_le_bytes());

    let prefix_offset = buf.len() as u64;
    buf.extend_from_slice(&1u32.to_le_bytes());
    push_unicode(&mut buf, "");

    let object_offset = buf.len() as u64;
    let mut record = Vec::new();
    record.extend_from_slice(&0u32.to_le_bytes());
    push_unicode(&mut record, "CN=Alice,DC=corp,DC=local");
    record.extend_from_slice(&1u32.to_le_bytes()); // attribute_count
    push_string_attr(&mut record, 0, "user");
    buf.extend_from_slice(&(record.len() as u32).to_le_bytes());
    buf.extend_from_slice(&record);

    buf[offsets_pos..offsets_pos + 8].copy_from_slice(&schema_offset.to_le_bytes());
    buf[offsets_pos + 8..offsets_pos + 16].copy_from_slice(&class_offset.to_le_bytes());
    buf[offsets_pos + 16..offsets_pos + 24].copy_from_slice(&prefix_offset.to_le_bytes());
    buf[offsets_pos + 24..offsets_pos + 32].copy_from_slice(&object_offset.to_le_bytes());
    buf
}

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_temp_file(bytes: &[u8]) -> std::path::PathBuf {
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "adx-cli-fixture-{}-{unique}.bin",
        std::process::id()
    ));
    std::fs::write(&path, bytes).unwrap();
    path
}

fn run_cli(args: &[&str]) -> ExitStatus {
    let cli = Cli::parse_from(std::iter::once("adx-cli").chain(args.iter().copied()));
    adx_cli::run_status(&cli)
}

#[test]
fn query_with_matches_exits_zero() {
    let path = write_temp_file(&build_fixture());
    let exit = run_cli(&["query", path.to_str().unwrap(), "(objectClass=user)"]);
    assert_eq!(exit, ExitStatus::Success);
    assert_eq!(exit.code(), 0);
}

#[test]
fn query_with_no_matches_exits_one() {
    let path = write_temp_file(&build_fixture());
    let exit = run_cli(&["query", path.to_str().unwrap(), "(objectClass=computer)"]);
    assert_eq!(exit, ExitStatus::NoMatches);
    assert_eq!(exit.code(), 1);
}

#[test]
fn malformed_filter_exits_two() {
    let path = write_temp_file(&build_fixture());
    let exit = run_cli(&["query", path.to_str().unwrap(), "(objectClass=user"]);
    assert_eq!(exit, ExitStatus::FilterError);
    assert_eq!(exit.code(), 2);
}

#[test]
fn corrupt_snapshot_exits_three() {
    let mut bytes = build_fixture();
    bytes[0] = b'X'; // clobber the signature
    let path = write_temp_file(&bytes);
    let exit = run_cli(&["query", path.to_str().unwrap(), "(objectClass=user)"]);
    assert_eq!(exit, ExitStatus::SnapshotError);
    assert_eq!(exit.code(), 3);
}

#[test]
fn dump_header_exits_zero() {
    let path = write_temp_file(&build_fixture());
    let exit = run_cli(&["dump-header", path.to_str().unwrap()]);
    assert_eq!(exit, ExitStatus::Success);
}

#[test]
fn missing_snapshot_file_exits_three() {
    let path = std::env::temp_dir().join("adx-cli-does-not-exist.bin");
    let exit = run_cli(&["dump-header", path.to_str().unwrap()]);
    assert_eq!(exit, ExitStatus::SnapshotError);
}
