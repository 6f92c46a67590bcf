//! Result query compilation from [`FilterCriteria`].

use super::{CompiledQuery, QueryBuilder};
use crate::constants::RESULTS_TABLE;
use crate::models::FilterCriteria;

/// Projection of the result query: IP rendered from its integer form
const BANNER_FIELDS: [&str; 4] = ["INET_NTOA(ip)", "port", "service", "content"];

/// Compile filter criteria into a single parameterized result query
///
/// Clauses always appear in the order IP, ports, services, regexp, and the
/// argument list follows the same order, so argument *i* is bound to
/// placeholder *i*. Absent criteria contribute neither SQL nor arguments;
/// empty criteria compile to the unfiltered query.
pub fn compile(criteria: &FilterCriteria) -> CompiledQuery {
    QueryBuilder::new(RESULTS_TABLE)
        .select(&BANNER_FIELDS)
        .distinct()
        .where_eq_function("ip", "INET_ATON", criteria.ip.as_deref())
        .where_in("port", &criteria.ports)
        .where_in("service", &criteria.services)
        .where_regexp("content", criteria.regexp.as_deref())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT DISTINCT INET_NTOA(ip), port, service, content FROM banners";

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_criteria_is_unfiltered() {
        let query = compile(&FilterCriteria::new());
        assert_eq!(query.sql(), BASE);
        assert!(!query.sql().contains("WHERE"));
        assert_eq!(query.placeholder_count(), 0);
        assert!(query.arguments().is_empty());
    }

    #[test]
    fn test_full_criteria_argument_order() {
        let criteria = FilterCriteria::new()
            .with_ip("1.2.3.4")
            .with_ports(strings(&["80", "443"]))
            .with_services(strings(&["http"]))
            .with_regexp("ssh");
        let query = compile(&criteria);

        assert_eq!(
            query.sql(),
            format!(
                "{BASE} WHERE ip = INET_ATON(?) AND port IN (?, ?) AND service IN (?) AND content REGEXP ?"
            )
        );
        assert_eq!(query.arguments(), ["1.2.3.4", "80", "443", "http", "ssh"]);
        assert_eq!(query.placeholder_count(), 5);
    }

    #[test]
    fn test_single_port_membership() {
        let query = compile(&FilterCriteria::new().with_ports(strings(&["22"])));
        assert_eq!(query.sql(), format!("{BASE} WHERE port IN (?)"));
        assert_eq!(query.arguments(), ["22"]);
    }

    #[test]
    fn test_no_leading_and_when_first_clause_absent() {
        let query = compile(&FilterCriteria::new().with_services(strings(&["ssh", "telnet"])));
        assert_eq!(query.sql(), format!("{BASE} WHERE service IN (?, ?)"));

        let query = compile(&FilterCriteria::new().with_regexp("^220"));
        assert_eq!(query.sql(), format!("{BASE} WHERE content REGEXP ?"));
    }

    #[test]
    fn test_empty_list_elements_are_bound() {
        let query = compile(&FilterCriteria::new().with_ports(strings(&["80", "", "443"])));
        assert_eq!(query.sql(), format!("{BASE} WHERE port IN (?, ?, ?)"));
        assert_eq!(query.arguments(), ["80", "", "443"]);
    }

    #[test]
    fn test_ip_and_regexp_only() {
        let criteria = FilterCriteria::new().with_ip("192.168.1.10").with_regexp("OpenSSH");
        let query = compile(&criteria);
        assert_eq!(
            query.sql(),
            format!("{BASE} WHERE ip = INET_ATON(?) AND content REGEXP ?")
        );
        assert_eq!(query.arguments(), ["192.168.1.10", "OpenSSH"]);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let criteria = FilterCriteria::new()
            .with_ip("10.1.1.1")
            .with_services(strings(&["smtp"]));
        assert_eq!(compile(&criteria), compile(&criteria));
    }
}
