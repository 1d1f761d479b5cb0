//! Scalar functions over single values, for use on rows already in DuckDB.

use std::error::Error;

use duckdb::{
    core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId},
    vscalar::{ScalarFunctionSignature, VScalar},
    vtab::arrow::WritableVector,
};

use super::bounty::decompose_bounty;
use super::dialect::FileKind;
use super::interop::scalar::{
    VarcharOutput, invoke_f64_f64_i64_to_varchar, invoke_unary_i64_to_varchar,
    invoke_unary_varchar_to_varchar,
};
use super::stage::StageBucket;

fn bounty_json(bounty: f64, buy_in: f64, players: i64) -> VarcharOutput {
    VarcharOutput::Value(decompose_bounty(bounty, buy_in, players).to_json())
}

fn stage_label(players: i64) -> VarcharOutput {
    StageBucket::from_players(players)
        .map(|bucket| bucket.label().to_string())
        .into()
}

fn file_kind_label(text: &str) -> VarcharOutput {
    match FileKind::sniff(text) {
        FileKind::Unrecognized => VarcharOutput::Null,
        kind => VarcharOutput::Value(kind.label().to_string()),
    }
}

/// `poker_bounty_decompose(bounty DOUBLE, buy_in DOUBLE, players BIGINT) -> VARCHAR`
pub struct BountyDecomposeScalar;

impl VScalar for BountyDecomposeScalar {
    type State = ();

    unsafe fn invoke(
        _state: &Self::State,
        input: &mut DataChunkHandle,
        output: &mut dyn WritableVector,
    ) -> Result<(), Box<dyn Error>> {
        invoke_f64_f64_i64_to_varchar(input, output, bounty_json)
    }

    fn signatures() -> Vec<ScalarFunctionSignature> {
        vec![ScalarFunctionSignature::exact(
            vec![
                LogicalTypeHandle::from(LogicalTypeId::Double),
                LogicalTypeHandle::from(LogicalTypeId::Double),
                LogicalTypeHandle::from(LogicalTypeId::Bigint),
            ],
            LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )]
    }
}

/// `poker_stage_bucket(players BIGINT) -> VARCHAR`
pub struct StageBucketScalar;

impl VScalar for StageBucketScalar {
    type State = ();

    unsafe fn invoke(
        _state: &Self::State,
        input: &mut DataChunkHandle,
        output: &mut dyn WritableVector,
    ) -> Result<(), Box<dyn Error>> {
        invoke_unary_i64_to_varchar(input, output, stage_label)
    }

    fn signatures() -> Vec<ScalarFunctionSignature> {
        vec![ScalarFunctionSignature::exact(
            vec![LogicalTypeHandle::from(LogicalTypeId::Bigint)],
            LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )]
    }
}

/// `poker_file_kind(text VARCHAR) -> VARCHAR`
pub struct FileKindScalar;

impl VScalar for FileKindScalar {
    type State = ();

    unsafe fn invoke(
        _state: &Self::State,
        input: &mut DataChunkHandle,
        output: &mut dyn WritableVector,
    ) -> Result<(), Box<dyn Error>> {
        invoke_unary_varchar_to_varchar(input, output, file_kind_label)
    }

    fn signatures() -> Vec<ScalarFunctionSignature> {
        vec![ScalarFunctionSignature::exact(
            vec![LogicalTypeHandle::from(LogicalTypeId::Varchar)],
            LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )]
    }
}
