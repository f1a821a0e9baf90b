//! Implementation of the `relocator validate` command.
//!
//! Responsibility: turn CLI arguments into a `RelocationRequest`, run the
//! relocation checks, and report the verdict. No business logic lives here.

use serde::Serialize;
use tracing::{info, instrument};

use relocator_core::domain::{RelocationRequest, ValidationResult};

use crate::{
    cli::{GlobalArgs, ValidateArgs},
    commands::{load_inventory, relocation_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// JSON shape of a verdict: the request plus the flattened result.
#[derive(Debug, Serialize)]
struct VerdictReport<'a> {
    request: &'a RelocationRequest,
    #[serde(flatten)]
    verdict: &'a ValidationResult,
}

/// Execute the `relocator validate` command.
///
/// A refused relocation becomes [`CliError::RelocationRejected`] so the
/// process exits non-zero; in JSON mode the verdict is printed first.
#[instrument(skip_all, fields(disk = %args.disk))]
pub fn execute(
    args: ValidateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let inventory = load_inventory(&global, &config)?;
    let service = relocation_service(&inventory, &config);

    let request = RelocationRequest::new(
        args.disk,
        args.source,
        args.dest,
        args.operation.into(),
    );
    info!(%request, "Validating relocation");

    let verdict = service.validate(&request)?;

    if output.is_json() {
        output.json(&VerdictReport {
            request: &request,
            verdict: &verdict,
        })?;
    }

    match verdict {
        ValidationResult::Valid => {
            if !output.is_json() {
                output.success(&format!("Allowed: {request}"))?;
            }
            Ok(())
        }
        ValidationResult::Invalid(failure) => Err(CliError::RelocationRejected { failure }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relocator_core::domain::{FailureReason, Guid, ImageOperation};

    fn request() -> RelocationRequest {
        RelocationRequest::new(
            Guid::from_u128(1),
            Guid::from_u128(0x10),
            Guid::from_u128(0x20),
            ImageOperation::Copy,
        )
    }

    #[test]
    fn report_flattens_valid_verdict() {
        let request = request();
        let json = serde_json::to_value(VerdictReport {
            request: &request,
            verdict: &ValidationResult::Valid,
        })
        .unwrap();
        assert_eq!(json["verdict"], "valid");
        assert_eq!(json["request"]["operation"], "copy");
    }

    #[test]
    fn report_carries_reason_code() {
        let request = request();
        let verdict = ValidationResult::fail(FailureReason::SourceAndTargetSame);
        let json = serde_json::to_value(VerdictReport {
            request: &request,
            verdict: &verdict,
        })
        .unwrap();
        assert_eq!(json["verdict"], "invalid");
        assert_eq!(json["reason"], "SOURCE_AND_TARGET_SAME");
    }
}
