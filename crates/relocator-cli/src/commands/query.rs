//! Implementation of the `relocator query` command.
//!
//! Runs one registered query as a CLI session and prints the
//! `QueryReturnValue` as JSON.

use tracing::instrument;

use relocator_core::application::{ExecutionContext, QueryParameters, QueryService};
use relocator_core::domain::{Guid, RelocationRequest};

use crate::{
    cli::{GlobalArgs, QueryArgs},
    commands::{load_inventory, relocation_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(query = %args.query_type))]
pub fn execute(
    args: QueryArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let params = parameters(&args)?;
    let ctx = context(&args);

    let inventory = load_inventory(&global, &config)?;
    let queries = QueryService::new(inventory.readers(), relocation_service(&inventory, &config));

    let result = queries.execute(&ctx, args.query_type, &params);
    output.json(&result)?;

    if result.succeeded {
        Ok(())
    } else {
        Err(CliError::QueryFailed {
            message: result.exception_string.unwrap_or_default(),
        })
    }
}

fn context(args: &QueryArgs) -> ExecutionContext {
    ExecutionContext::user(format!("cli-{}", Guid::new_random()), Guid::new_random(), args.admin)
        .with_internal_execution(args.internal)
}

fn parameters(args: &QueryArgs) -> CliResult<QueryParameters> {
    let request = match (args.disk, args.source, args.dest) {
        (Some(disk), Some(source), Some(dest)) => Some(RelocationRequest::new(
            disk,
            source,
            dest,
            args.operation.into(),
        )),
        (None, None, None) => None,
        _ => {
            return Err(CliError::InvalidInput {
                message: "--disk, --source and --dest must be given together".into(),
            });
        }
    };

    Ok(QueryParameters {
        filtered: args.filtered,
        id: args.id,
        request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Operation;
    use relocator_core::application::QueryType;

    fn args() -> QueryArgs {
        QueryArgs {
            query_type: QueryType::GetRelocationVerdict,
            id: None,
            disk: None,
            source: None,
            dest: None,
            operation: Operation::Move,
            filtered: false,
            admin: false,
            internal: false,
        }
    }

    #[test]
    fn partial_request_is_rejected() {
        let mut a = args();
        a.disk = Some(Guid::from_u128(1));
        assert!(matches!(parameters(&a), Err(CliError::InvalidInput { .. })));
    }

    #[test]
    fn full_request_is_built() {
        let mut a = args();
        a.disk = Some(Guid::from_u128(1));
        a.source = Some(Guid::from_u128(0x10));
        a.dest = Some(Guid::from_u128(0x20));
        a.filtered = true;

        let params = parameters(&a).unwrap();
        assert!(params.filtered);
        assert_eq!(params.request.map(|r| r.dest_domain_id), Some(Guid::from_u128(0x20)));
    }

    #[test]
    fn context_reflects_flags() {
        let mut a = args();
        a.admin = true;
        a.internal = true;
        let ctx = context(&a);
        assert!(ctx.user_is_admin());
        assert!(ctx.internal_execution);
    }
}
