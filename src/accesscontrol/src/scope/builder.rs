/// Scope construction helpers
///
/// Scopes are colon-separated strings (`kind:selector:value`). These helpers
/// build and decompose them, and produce the placeholders a later templating
/// stage substitutes with request parameters or context fields.

/// Scope segment separator
pub const SEPARATOR: char = ':';

/// Builds a scope from parts
///
/// Parts are joined with `:` as given; they are not validated.
///
/// # Examples
///
/// ```
/// use accesscontrol::scope::scope;
///
/// assert_eq!(scope(["users", "*"]), "users:*");
/// assert_eq!(scope(["orgs", "id", "1"]), "orgs:id:1");
/// ```
pub fn scope<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (idx, part) in parts.into_iter().enumerate() {
        if idx != 0 {
            out.push(SEPARATOR);
        }
        out.push_str(part.as_ref());
    }
    out
}

/// Injectable scope part referencing a URL parameter
///
/// ```
/// use accesscontrol::scope::{parameter, scope};
///
/// assert_eq!(
///     scope(["users", "id", parameter(":id").as_str()]),
///     r#"users:id:{{ index .URLParams ":id" }}"#
/// );
/// ```
pub fn parameter(key: &str) -> String {
    format!(r#"{{{{ index .URLParams "{}" }}}}"#, key)
}

/// Injectable scope part referencing a field of the request's scope params
///
/// ```
/// use accesscontrol::scope::field;
///
/// assert_eq!(field("OrgID"), "{{ .OrgID }}");
/// ```
pub fn field(key: &str) -> String {
    format!("{{{{ .{} }}}}", key)
}

/// Blanks the last segment of a scope
///
/// `datasources:name:influx` becomes `datasources:name:`. A scope with a single
/// segment (including the empty string) yields the empty prefix, which no
/// attribute resolver can be registered under.
///
/// ```
/// use accesscontrol::scope::scope_prefix;
///
/// assert_eq!(scope_prefix("datasources:name:influx"), "datasources:name:");
/// assert_eq!(scope_prefix("orgs"), "");
/// ```
pub fn scope_prefix(scope: &str) -> String {
    match scope.rfind(SEPARATOR) {
        Some(idx) => scope[..=idx].to_string(),
        None => String::new(),
    }
}

/// The final segment of a scope, i.e. the attribute value a resolver looks up
pub fn attribute_value(scope: &str) -> &str {
    match scope.rfind(SEPARATOR) {
        Some(idx) => &scope[idx + 1..],
        None => scope,
    }
}
