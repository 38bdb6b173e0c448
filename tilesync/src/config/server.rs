use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP to bind to. Default: 0.0.0.0
	pub ip: Option<String>,

	/// TCP port to bind to. Default: 8085
	pub port: Option<u16>,

	/// Whether requested rows count from the top (OSM) instead of the bottom (TMS).
	pub zero_is_top: Option<bool>,
}

impl ServerConfig {
	pub fn override_optional_ip(&mut self, ip: &Option<String>) {
		if ip.is_some() {
			self.ip.clone_from(ip);
		}
	}

	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if port.is_some() {
			self.port = *port;
		}
	}

	pub fn override_optional_zero_is_top(&mut self, zero_is_top: &Option<bool>) {
		if zero_is_top.is_some() {
			self.zero_is_top = *zero_is_top;
		}
	}
}
