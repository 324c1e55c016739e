use failsafe::{backoff, failure_policy, Config};
use std::time::Duration;

/// Circuit breaker type guarding calls to the text-generation provider.
pub type LlmCircuitBreaker =
    failsafe::StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Creates a circuit breaker for text-generation calls.
///
/// An unreachable or failing provider would otherwise cost every lead-detail
/// request a full timeout before falling back to templates. Once the circuit
/// is open, calls are rejected immediately and the composer uses its
/// templates straight away.
///
/// # Configuration
///
/// - **Failure threshold**: 5 consecutive failures triggers OPEN state.
/// - **Backoff**: Exponential backoff from 10s to 60s before attempting recovery.
///
/// # States
///
/// - **CLOSED**: Normal operation, requests pass through.
/// - **OPEN**: Too many failures, requests fail fast.
/// - **HALF_OPEN**: Testing if the provider recovered.
///
/// # Returns
///
/// * `LlmCircuitBreaker` - The configured circuit breaker instance.
pub fn create_llm_circuit_breaker() -> LlmCircuitBreaker {
    let backoff_strategy = backoff::exponential(
        Duration::from_secs(10), // Initial delay
        Duration::from_secs(60), // Maximum delay
    );

    let failure_policy = failure_policy::consecutive_failures(5, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationError;
    use failsafe::futures::CircuitBreaker;
    use failsafe::Error;

    async fn provider_call(
        cb: &LlmCircuitBreaker,
        reply: Result<&'static str, GenerationError>,
    ) -> Result<String, Error<GenerationError>> {
        cb.call(async move { reply.map(str::to_string) }).await
    }

    fn provider_down() -> GenerationError {
        GenerationError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_circuit_opens_after_five_provider_failures() {
        let cb = create_llm_circuit_breaker();

        for _ in 0..5 {
            let result = provider_call(&cb, Err(provider_down())).await;
            assert!(matches!(result, Err(Error::Inner(GenerationError::Status { status: 503, .. }))));
        }

        let result = provider_call(&cb, Ok("WHATSAPP: hi")).await;
        assert!(matches!(result, Err(Error::Rejected)));
    }

    #[tokio::test]
    async fn test_success_passes_reply_through() {
        let cb = create_llm_circuit_breaker();

        let result = provider_call(&cb, Ok("WHATSAPP: hi")).await;

        assert_eq!(result.unwrap(), "WHATSAPP: hi");
    }

    #[tokio::test]
    async fn test_intermittent_failures_keep_circuit_closed() {
        let cb = create_llm_circuit_breaker();

        for _ in 0..3 {
            for _ in 0..4 {
                let _ = provider_call(&cb, Err(GenerationError::EmptyResponse)).await;
            }
            assert!(provider_call(&cb, Ok("CALL: hello")).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_clones_share_circuit_state() {
        let cb = create_llm_circuit_breaker();
        let shared = cb.clone();

        for _ in 0..5 {
            let _ = provider_call(&cb, Err(provider_down())).await;
        }

        let result = provider_call(&shared, Ok("EMAIL: hi")).await;
        assert!(matches!(result, Err(Error::Rejected)));
    }
}
