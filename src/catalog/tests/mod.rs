//! Fixtures shared by the catalogue parser tests

use std::io::Write;
use tempfile::NamedTempFile;

use crate::catalog::CatalogRecordParser;
use crate::config::{BlockSchema, DelimitedSchema, ParserConfig};

mod delimited_tests;
mod stats_tests;

/// First rows of a short ATNF export
pub fn short_export_csv() -> String {
    r#"#,NAME,Gl(deg),Gb(deg),P0(s),P1,F0(Hz),DM
1,J0006+1834,108.172,-42.985,0.693748,2.10e-15,1.441446,12.00
2,J0007+7303,119.660,10.463,0.315873,3.60e-13,3.165827,*
3,B0011+47,116.497,-14.631,1.240699,5.64e-16,0.805997,30.85
4,J0023+0923,111.383,-52.849,0.003050,*,327.868852,14.30
5,B0021-72C,305.923,-44.892,0.005757,-4.98e-20,173.708219,24.60"#
        .to_string()
}

/// Rows of an extended export with binary, distance and age columns
pub fn extended_export_csv() -> String {
    r#"#,NAME,Gl(deg),Gb(deg),P0(s),P1,F0(Hz),DM,BINARY,PB(days),A1,BINCOMP,DIST(kpc),DIST_DM(kpc),AGE(Yr),EDOT(ergs/s),PMTOT(mas/yr)
1,J0006+1834,108.172,-42.985,0.693748,2.10e-15,1.441446,12.00,*,*,*,*,0.82,0.82,5.24e+06,2.48e+32,*
2,J0023+0923,111.383,-52.849,0.003050,1.14e-20,327.868852,14.30,ELL1,0.139,0.0348,UL,0.69,0.69,4.24e+09,1.46e+34,0
3,J0034-0534,111.492,-68.069,0.001877,4.96e-21,532.713,13.77,BT,1.589,1.438,He,1.35,0.54,6.00e+09,3.00e+34,31.00"#
        .to_string()
}

/// Two complete ATNF blocks behind the usual catalogue banner
pub fn atnf_blocks() -> String {
    r#"#CATALOGUE 1.54
#
# DO NOT EDIT THIS FILE!
#
PSRJ     J0006+1834                    cnt96
RAJ      00:06:04.8               2    cn95
DECJ     +18:34:59                4    cn95
P0       0.69374767047            14   cn95
P1       2.097E-15                12   cn95
PEPOCH   49079.5                       cn95
DM       12.0                     6    cn95
S400     0.2                           cn95
W50      82                            cn95
W10      195                           cn95
DIST_DM  0.70                          tc93
DIST_DM1 0.68                          cl02
SURVEY   ar4
@-----------------------------------------------------------------
PSRJ     J0007+7303                    aaa+09c
RAJ      00:07:01.7               2    awd+12
DECJ     +73:03:07.4              8    awd+12
F0       3.165827392              3    awd+12
F1       -3.6120E-12              5    awd+12
PEPOCH   54952                         awd+12
DMEPOCH  54952
TYPE     NRAD
SURVEY   FermiBlind
@-----------------------------------------------------------------
"#
    .to_string()
}

pub fn short_parser() -> CatalogRecordParser {
    CatalogRecordParser::new(ParserConfig::delimited(DelimitedSchema::short_export())).unwrap()
}

pub fn extended_parser() -> CatalogRecordParser {
    CatalogRecordParser::new(ParserConfig::delimited(DelimitedSchema::extended_export())).unwrap()
}

pub fn block_parser() -> CatalogRecordParser {
    CatalogRecordParser::new(ParserConfig::block(BlockSchema::atnf())).unwrap()
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{}", content).unwrap();
    temp_file
}
