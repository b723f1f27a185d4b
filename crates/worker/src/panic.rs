use tokio::task::JoinError;

/// Extracts the panic message carried by a failed task, if it panicked.
///
/// Returns `None` for cancelled tasks.
pub fn join_error_panic_message(err: JoinError) -> Option<String> {
	let payload = err.try_into_panic().ok()?;
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		return Some((*msg).to_string());
	}
	if let Some(msg) = payload.downcast_ref::<String>() {
		return Some(msg.clone());
	}
	Some("non-string panic payload".to_string())
}

/// Renders any join failure as a message, panic or cancellation alike.
pub fn join_error_message(err: JoinError) -> String {
	if err.is_cancelled() {
		return "task cancelled".to_string();
	}
	join_error_panic_message(err).unwrap_or_else(|| "task failed".to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{TaskClass, spawn};

	#[tokio::test]
	async fn panicking_step_reports_its_payload() {
		let err = spawn(TaskClass::Attribute, async { panic!("bad attribute") }).await.unwrap_err();
		assert_eq!(join_error_message(err), "bad attribute");

		let tag = String::from("shape");
		let err = spawn(TaskClass::Element, async move { panic!("<{tag}> exploded") }).await.unwrap_err();
		assert_eq!(join_error_panic_message(err).as_deref(), Some("<shape> exploded"));
	}

	#[tokio::test]
	async fn opaque_payload_still_yields_a_message() {
		let err = spawn(TaskClass::Element, async { std::panic::panic_any(17_u8) }).await.unwrap_err();
		assert_eq!(join_error_message(err), "non-string panic payload");
	}

	#[tokio::test]
	async fn aborted_step_is_cancelled_not_panicked() {
		let handle = spawn(TaskClass::Document, std::future::pending::<()>());
		handle.abort();
		let err = handle.await.unwrap_err();
		assert!(err.is_cancelled());
		assert_eq!(join_error_message(err), "task cancelled");
	}
}
