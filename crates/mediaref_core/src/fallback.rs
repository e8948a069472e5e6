//! Ordered fallback chains for derived display fields.

/// One step of a [`FallbackChain`]: yields a candidate value or nothing.
pub type FallbackStep<C> = fn(&C) -> Option<String>;

/// An ordered list of named steps evaluated top to bottom.
///
/// The first step producing a non-blank value wins.
///
/// # Examples
///
/// ```
/// use mediaref_core::FallbackChain;
///
/// struct Names {
///     nickname: Option<String>,
///     login: String,
/// }
///
/// let chain = FallbackChain::new()
///     .then("nickname", |n: &Names| n.nickname.clone())
///     .then("login", |n: &Names| Some(n.login.clone()));
///
/// let names = Names { nickname: Some("  ".into()), login: "jdoe".into() };
/// assert_eq!(chain.resolve_with_step(&names), Some(("login", "jdoe".to_string())));
/// ```
#[derive(Debug, Clone)]
pub struct FallbackChain<C> {
    steps: Vec<(&'static str, FallbackStep<C>)>,
}

impl<C> FallbackChain<C> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    pub fn then(mut self, name: &'static str, step: FallbackStep<C>) -> Self {
        self.steps.push((name, step));
        self
    }

    /// First non-blank value.
    pub fn resolve(&self, context: &C) -> Option<String> {
        self.resolve_with_step(context).map(|(_, value)| value)
    }

    /// First non-blank value together with the name of the step that produced it.
    pub fn resolve_with_step(&self, context: &C) -> Option<(&'static str, String)> {
        self.steps.iter().find_map(|(name, step)| {
            step(context)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*name, value))
        })
    }

    /// Step names in evaluation order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(name, _)| *name).collect()
    }
}

impl<C> Default for FallbackChain<C> {
    fn default() -> Self {
        Self::new()
    }
}
