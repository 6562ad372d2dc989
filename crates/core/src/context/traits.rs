use super::types::ContextTokens;

/// Source of the per-visit context a flow runs under.
///
/// The orchestrator depends on this capability but never owns or persists
/// what sits behind it.
pub trait SessionContext: Send + Sync {
    /// Current referral tokens.
    fn tokens(&self) -> ContextTokens;

    /// Name of this context source, for logging.
    fn source_name(&self) -> &'static str;
}
