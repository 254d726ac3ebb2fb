//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use deltax_core::log_op_start;
/// log_op_start!("diff");
/// log_op_start!("diff", entities_1 = 10, entities_2 = 12);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = deltax_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = deltax_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use deltax_core::log_op_end;
/// log_op_end!("diff", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = deltax_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = deltax_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use deltax_core::{log_op_error, errors::DeltaXError};
/// let err = DeltaXError::Internal { message: "boom".to_string() };
/// log_op_error!("verify", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::DxError;
        let dx_err: DxError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = deltax_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?dx_err.kind(),
            err_code = dx_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::DxError;
        let dx_err: DxError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = deltax_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?dx_err.kind(),
            err_code = dx_err.code(),
            $($field)*
        );
    }};
}
