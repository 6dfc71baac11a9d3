pub mod slug_redirect;

pub mod depot_keys {
    /// `Record` the request path resolved to without a redirect.
    pub const RESOLVED_RECORD: &str = "__resolved_record";
    /// `SlugOutcome` of a lookup that yielded no record to render.
    pub const SLUG_OUTCOME: &str = "__slug_outcome";
}
