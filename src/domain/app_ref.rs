//! Usage: Application reference value format (launch-intent URI + legacy upgrade).

pub const LEGACY_SEPARATOR: &str = "#C3C0#";

const URI_PREFIX: &str = "intent:#Intent;";
const URI_TERMINATOR: &str = "end";
const ACTION_MAIN: &str = "action=android.intent.action.MAIN";
const CATEGORY_LAUNCHER: &str = "category=android.intent.category.LAUNCHER";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    pub package: String,
    pub class: String,
}

impl ComponentRef {
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            class: class.into(),
        }
    }

    /// `pkg/.Cls` when the class lives under the package, `pkg/cls` otherwise.
    pub fn flatten_short(&self) -> String {
        match self.class.strip_prefix(&self.package) {
            Some(rest) if rest.starts_with('.') => format!("{}/{rest}", self.package),
            _ => format!("{}/{}", self.package, self.class),
        }
    }

    pub fn unflatten(flat: &str) -> Result<Self, String> {
        let (package, class) = flat
            .split_once('/')
            .ok_or_else(|| format!("SEC_INVALID_INPUT: malformed component: {flat}"))?;
        if package.is_empty() || class.is_empty() {
            return Err(format!("SEC_INVALID_INPUT: malformed component: {flat}"));
        }

        let class = if let Some(rest) = class.strip_prefix('.') {
            format!("{package}.{rest}")
        } else {
            class.to_string()
        };

        Ok(Self::new(package, class))
    }
}

pub fn format_app_ref(component: &ComponentRef) -> String {
    format!(
        "{URI_PREFIX}{ACTION_MAIN};{CATEGORY_LAUNCHER};component={};{URI_TERMINATOR}",
        component.flatten_short()
    )
}

pub fn is_legacy_app_ref(value: &str) -> bool {
    value.contains(LEGACY_SEPARATOR)
}

/// Pure read-boundary upgrade of a legacy `pkg#C3C0#Cls` value to the URI
/// form referencing the same component.
pub fn upgrade_legacy_app_ref(value: &str) -> Result<String, String> {
    let component = parse_legacy(value)?;
    Ok(format_app_ref(&component))
}

/// Accepts both the URI form and the legacy delimiter form.
pub fn parse_app_ref(value: &str) -> Result<ComponentRef, String> {
    if is_legacy_app_ref(value) {
        return parse_legacy(value);
    }

    let body = value
        .strip_prefix(URI_PREFIX)
        .ok_or_else(|| format!("SEC_INVALID_INPUT: not an app reference: {value}"))?;

    let mut component = None;
    let mut terminated = false;
    for part in body.split(';') {
        if part == URI_TERMINATOR {
            terminated = true;
            break;
        }
        if let Some(flat) = part.strip_prefix("component=") {
            component = Some(ComponentRef::unflatten(flat)?);
        }
    }

    if !terminated {
        return Err(format!(
            "SEC_INVALID_INPUT: unterminated app reference: {value}"
        ));
    }
    component.ok_or_else(|| format!("SEC_INVALID_INPUT: app reference has no component: {value}"))
}

fn parse_legacy(value: &str) -> Result<ComponentRef, String> {
    let (package, class) = value
        .split_once(LEGACY_SEPARATOR)
        .ok_or_else(|| format!("SEC_INVALID_INPUT: not a legacy app reference: {value}"))?;
    if package.is_empty() || class.is_empty() {
        return Err(format!(
            "SEC_INVALID_INPUT: malformed legacy app reference: {value}"
        ));
    }
    Ok(ComponentRef::new(package, class))
}
