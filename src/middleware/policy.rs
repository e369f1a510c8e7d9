use http::Method;

use crate::models::user::Role;

const PRIVILEGED: &[Role] = &[Role::Enterprise];

/// One row of the access table: requests matching `method` on the route
/// template `path` are only served to `roles`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub method: Method,
    pub path: &'static str,
    pub roles: &'static [Role],
}

/// Routes that are not listed are open to any authenticated role.
pub static ACCESS_RULES: &[Rule] = &[
    Rule { method: Method::POST, path: "/api/sessions", roles: PRIVILEGED },
    Rule { method: Method::PUT, path: "/api/sessions/:id", roles: PRIVILEGED },
    Rule { method: Method::DELETE, path: "/api/sessions/:id", roles: PRIVILEGED },
    Rule { method: Method::POST, path: "/api/companies", roles: PRIVILEGED },
    Rule { method: Method::PUT, path: "/api/companies/:id", roles: PRIVILEGED },
    Rule { method: Method::DELETE, path: "/api/companies/:id", roles: PRIVILEGED },
    Rule { method: Method::POST, path: "/api/dsa/topics", roles: PRIVILEGED },
    Rule { method: Method::DELETE, path: "/api/dsa/topics/:id", roles: PRIVILEGED },
    Rule { method: Method::POST, path: "/api/dsa/topics/:id/questions", roles: PRIVILEGED },
    Rule {
        method: Method::DELETE,
        path: "/api/dsa/topics/:id/questions/:question_id",
        roles: PRIVILEGED,
    },
    Rule { method: Method::POST, path: "/api/games", roles: PRIVILEGED },
    Rule { method: Method::DELETE, path: "/api/games/:id", roles: PRIVILEGED },
];

#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    rules: &'static [Rule],
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(ACCESS_RULES)
    }
}

impl AccessPolicy {
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn required_roles(&self, method: &Method, path: &str) -> Option<&'static [Role]> {
        self.rules
            .iter()
            .find(|rule| rule.method == *method && rule.path == path)
            .map(|rule| rule.roles)
    }

    pub fn permits(&self, method: &Method, path: &str, role: Role) -> bool {
        match self.required_roles(method, path) {
            Some(roles) => roles.contains(&role),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_writes_need_enterprise() {
        let policy = AccessPolicy::default();
        assert!(!policy.permits(&Method::POST, "/api/sessions", Role::Farmer));
        assert!(policy.permits(&Method::POST, "/api/sessions", Role::Enterprise));
        assert!(!policy.permits(&Method::PUT, "/api/sessions/:id", Role::Farmer));
        assert!(!policy.permits(&Method::DELETE, "/api/sessions/:id", Role::Farmer));
    }

    #[test]
    fn reads_are_open_to_every_role() {
        let policy = AccessPolicy::default();
        for path in ["/api/sessions", "/api/companies", "/api/dsa/topics", "/api/games"] {
            assert!(policy.permits(&Method::GET, path, Role::Farmer), "{}", path);
            assert!(policy.permits(&Method::GET, path, Role::Enterprise), "{}", path);
        }
    }

    #[test]
    fn unlisted_routes_have_no_role_requirement() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.required_roles(&Method::PUT, "/api/user/profile"), None);
        assert!(policy.permits(&Method::PUT, "/api/user/profile", Role::Farmer));
    }

    #[test]
    fn every_rule_is_unique() {
        for (i, a) in ACCESS_RULES.iter().enumerate() {
            for b in &ACCESS_RULES[i + 1..] {
                assert!(
                    !(a.method == b.method && a.path == b.path),
                    "duplicate rule {} {}",
                    a.method,
                    a.path
                );
            }
        }
    }
}
