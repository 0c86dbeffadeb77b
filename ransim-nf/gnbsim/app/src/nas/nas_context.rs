/// Shared storage of the 5GMM state machine. The registration request is
/// kept in its encoded form for the initial-NAS replay in Security Mode
/// Complete; RES* lives here between key derivation and the response
/// carrying it.
#[derive(Debug, Default)]
pub struct NasContext {
	pub registration_request: Option<Vec<u8>>,
	pub res_star: Option<[u8; 16]>,
}

impl NasContext {
	pub fn new() -> Self {
		Self::default()
	}
}
