/// Optional search criteria for scan results
///
/// Every field is independently optional. List fields keep the caller's order
/// and keep empty elements: `port=80,,443` yields three ports, the middle one
/// empty, and each is bound as a literal argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub ip: Option<String>,
    pub ports: Vec<String>,
    pub services: Vec<String>,
    pub regexp: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build criteria from raw request values
    ///
    /// An empty IP path segment or an empty `regexp` value counts as absent.
    /// A present but empty `port`/`service` value yields a single empty
    /// element, matching a plain split on `,`.
    pub fn from_request_values(
        ip: Option<&str>,
        port: Option<&str>,
        service: Option<&str>,
        regexp: Option<&str>,
    ) -> Self {
        Self {
            ip: non_empty(ip),
            ports: split_list(port),
            services: split_list(service),
            regexp: non_empty(regexp),
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_ports(mut self, ports: Vec<String>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_services(mut self, services: Vec<String>) -> Self {
        self.services = services;
        self
    }

    pub fn with_regexp(mut self, regexp: impl Into<String>) -> Self {
        self.regexp = Some(regexp.into());
        self
    }

    /// True when no criterion is present
    pub fn is_empty(&self) -> bool {
        self.ip.is_none() && self.ports.is_empty() && self.services.is_empty() && self.regexp.is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}
