/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a start-up `Result`, or logs the error and exits with status 1.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr, $context:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("{}: {}", $context, e);
                std::process::exit(1);
            }
        }
    };
}

/// Locks a mutex, taking the guard back from a poisoned lock. Every critical
/// section in the crate leaves its state whole, so a poisoned lock still
/// holds consistent data.
#[macro_export]
macro_rules! lock {
    ($mutex:expr) => {
        $mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    };
}
