mod error_coverage;
