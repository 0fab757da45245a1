use std::fs;

use polyreport::{BenchTable, Experiment, ReportConfig, ReportError, export::pairwise};
use tempfile::TempDir;

const DKG_CSV: &str = "\
dkg,n,t,avg_deal_usec,avg_verify_best_case_usec,avg_verify_worst_case_usec,avg_reconstr_bc_usec,avg_reconstr_wc_usec
feld,16,8,1000,500,500,500,500
feld,32,16,4000,500,500,500,500
feld,64,32,16000,500,500,500,500
feld,128,64,64000,500,500,500,500
kate,16,8,1000,500,500,500,500
kate,32,16,2000,500,500,500,500
kate,64,32,4000,500,500,500,500
kate,128,64,8000,500,500,500,500
";

const THRESHSIG_CSV: &str = "\
interpolation_method,n,k,total_usec,lagr_usec,multiexp_usec
naive-lagr-wnk,32,17,100,60,40
naive-lagr-wnk,64,33,400,300,100
naive-lagr-wnk,128,65,1600,1400,200
naive-lagr-wnk,256,129,6400,6000,400
fft-eval,32,17,200,160,40
fft-eval,64,33,200,100,100
fft-eval,128,65,200,,
fft-eval,256,129,200,100,100
";

const BANDWIDTH_CSV: &str = "\
dkg,n,download_bw_bytes,upload_bw_bytes,comm_bw_bytes
Feldman,16,4096,4096,8192
Kate et al,16,1024,1024,2048
AMT,16,2048,3072,5120
";

fn load(contents: &str) -> BenchTable {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.csv");
    fs::write(&path, contents).unwrap();
    BenchTable::read_all(&[path]).unwrap()
}

#[test]
fn test_dkg_export_writes_improvement_for_crossing_pair() {
    let report = Experiment::Dkg
        .export(&load(DKG_CSV), &ReportConfig::default())
        .unwrap();
    let tex = report.macros.as_str();

    assert!(tex.contains("% Data for column 'avg_deal_usec'"));
    assert!(tex.contains("\\newcommand{\\jfDkgDealTime}[1]{%"));
    assert!(tex.contains("{16}{1.00 ms\\xspace}"));
    assert!(tex.contains("\\newcommand{\\ejfDkgDealTimeImprovOverjf}[1]{%"));
    assert!(tex.contains("{128}{8.0\\texttimes\\xspace}"));
    assert!(tex.contains("\\newcommand{\\ejfDkgDealTimeOutperformNjf}{32}\n"));
}

#[test]
fn test_dkg_export_skips_pairs_without_crossover() {
    let report = Experiment::Dkg
        .export(&load(DKG_CSV), &ReportConfig::default())
        .unwrap();
    let tex = report.macros.as_str();

    // identical verify timings never beat the margin
    assert!(!tex.contains("DkgVerifyBcTimeImprovOver"));
    assert!(tex.contains("\\newcommand{\\ejfDkgVerifyBcTime}[1]{%"));
    // sections after the skipped ones are still written
    assert!(tex.contains("% Data for column 'end_to_end_wc_usec'"));
    assert_eq!(report.comparisons.len(), 7);
    assert_eq!(
        report
            .comparisons
            .iter()
            .filter(|c| c.has_crossover())
            .count(),
        3
    );
}

#[test]
fn test_threshsig_export() {
    let report = Experiment::Threshsig
        .export(&load(THRESHSIG_CSV), &ReportConfig::default())
        .unwrap();
    let tex = report.macros.as_str();

    assert!(tex.contains("\\newcommand{\\blsNaiveTime}[1]{%"));
    assert!(tex.contains("\\newcommand{\\fastLagrTime}[1]{%"));
    assert!(tex.contains("{32}{0.5\\texttimes\\xspace}"));
    assert!(tex.contains("{256}{32.0\\texttimes\\xspace}"));
    assert!(tex.contains("\\newcommand{\\blsOutperformN}{128}\n"));

    // unmeasured fast Lagrange timing at n = 128 falls through to NODATA
    let fast_lagr = tex
        .split("\\newcommand")
        .find(|block| block.starts_with("{\\fastLagrTime}"))
        .unwrap();
    assert!(!fast_lagr.contains("{128}"));
}

#[test]
fn test_bandwidth_export_humanizes_bytes_and_overheads() {
    let report = Experiment::DkgBandwidth
        .export(&load(BANDWIDTH_CSV), &ReportConfig::default())
        .unwrap();
    let tex = report.macros.as_str();

    assert!(tex.contains("\\newcommand{\\ejfDkgDownload}[1]{%"));
    assert!(tex.contains("{16}{1.00 KiB\\xspace}"));
    assert!(tex.contains("\\newcommand{\\jfDkgComm}[1]{%"));
    assert!(tex.contains("\\newcommand{\\amtDkgUploadOverhead}[1]{%\n    \\IfStrEqCase{#1}{\n        {16}{3.0\\texttimes\\xspace}"));
    assert!(tex.contains("{16}{2.0\\texttimes\\xspace}"));
}

#[test]
fn test_custom_margin_and_symbol_flow_into_report() {
    let config = ReportConfig {
        margin: 3.0,
        improvement_symbol: "x".to_string(),
        ..ReportConfig::default()
    };
    let report = Experiment::Dkg.export(&load(DKG_CSV), &config).unwrap();
    let tex = report.macros.as_str();
    assert!(tex.contains("better than 3 and occur after n > 16"));
    assert!(tex.contains("{128}{8.0x\\xspace}"));
    assert!(tex.contains("\\newcommand{\\ejfDkgDealTimeOutperformNjf}{64}\n"));
}

#[test]
fn test_vss_export_requires_vss_columns() {
    let err = Experiment::Vss
        .export(&load(DKG_CSV), &ReportConfig::default())
        .unwrap_err();
    assert!(matches!(err, ReportError::MissingColumn(_)));
}

#[test]
fn test_pairwise_over_raw_labels() {
    let cmps = pairwise(
        &load(DKG_CSV),
        "dkg",
        "avg_deal_usec",
        &ReportConfig::default().compare_options(16.0),
    )
    .unwrap();
    assert_eq!(cmps.len(), 1);
    assert_eq!(cmps[0].winner, "kate");
    assert_eq!(cmps[0].first_crossing.unwrap().key, 32.0);
}
