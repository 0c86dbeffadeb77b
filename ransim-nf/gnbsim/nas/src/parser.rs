//! Dispatch between the wire and the typed 5GMM message set.

use enum_as_inner::EnumAsInner;

use crate::EPD_5GMM;
use crate::error::{NasDecodeError, NasEncodeError};
use crate::ie::NasBuf;
use crate::message::*;

#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum GmmMessage {
	RegistrationRequest(NasRegistrationRequest),
	RegistrationAccept(NasRegistrationAccept),
	RegistrationComplete(NasRegistrationComplete),
	RegistrationReject(NasRegistrationReject),
	AuthenticationRequest(NasAuthenticationRequest),
	AuthenticationResponse(NasAuthenticationResponse),
	AuthenticationReject(NasAuthenticationReject),
	SecurityModeCommand(NasSecurityModeCommand),
	SecurityModeComplete(NasSecurityModeComplete),
	GmmStatus(NasGmmStatus),
	ConfigurationUpdateCommand(NasConfigurationUpdateCommand),
	UlNasTransport(NasUlNasTransport),
	DlNasTransport(NasDlNasTransport),
}

impl GmmMessage {
	pub fn message_type(&self) -> u8 {
		match self {
			Self::RegistrationRequest(_) => MT_REGISTRATION_REQUEST,
			Self::RegistrationAccept(_) => MT_REGISTRATION_ACCEPT,
			Self::RegistrationComplete(_) => MT_REGISTRATION_COMPLETE,
			Self::RegistrationReject(_) => MT_REGISTRATION_REJECT,
			Self::AuthenticationRequest(_) => MT_AUTHENTICATION_REQUEST,
			Self::AuthenticationResponse(_) => MT_AUTHENTICATION_RESPONSE,
			Self::AuthenticationReject(_) => MT_AUTHENTICATION_REJECT,
			Self::SecurityModeCommand(_) => MT_SECURITY_MODE_COMMAND,
			Self::SecurityModeComplete(_) => MT_SECURITY_MODE_COMPLETE,
			Self::GmmStatus(_) => MT_GMM_STATUS,
			Self::ConfigurationUpdateCommand(_) => MT_CONFIGURATION_UPDATE_COMMAND,
			Self::UlNasTransport(_) => MT_UL_NAS_TRANSPORT,
			Self::DlNasTransport(_) => MT_DL_NAS_TRANSPORT,
		}
	}

	/// Decodes a plain (security header type 0) 5GMM frame.
	pub fn decode(buf: &[u8]) -> Result<Self, NasDecodeError> {
		let mut cursor = NasBuf::new(buf);
		let epd = cursor.take_u8()?;
		if epd != EPD_5GMM {
			return Err(NasDecodeError::UnexpectedProtocolDiscriminator(epd));
		}
		let sht = cursor.take_u8()? & 0x0F;
		if sht != 0 {
			return Err(NasDecodeError::UnknownSecurityHeader(sht));
		}
		let message_type = cursor.take_u8()?;
		let body = cursor.take(cursor.remaining())?;
		Self::decode_typed(message_type, body)
	}

	pub fn decode_typed(
		message_type: u8,
		body: &[u8],
	) -> Result<Self, NasDecodeError> {
		match message_type {
			MT_REGISTRATION_REQUEST => {
				Ok(Self::RegistrationRequest(NasRegistrationRequest::decode_body(body)?))
			}
			MT_REGISTRATION_ACCEPT => {
				Ok(Self::RegistrationAccept(NasRegistrationAccept::decode_body(body)?))
			}
			MT_REGISTRATION_COMPLETE => {
				Ok(Self::RegistrationComplete(NasRegistrationComplete::decode_body(body)?))
			}
			MT_REGISTRATION_REJECT => {
				Ok(Self::RegistrationReject(NasRegistrationReject::decode_body(body)?))
			}
			MT_AUTHENTICATION_REQUEST => {
				Ok(Self::AuthenticationRequest(NasAuthenticationRequest::decode_body(body)?))
			}
			MT_AUTHENTICATION_RESPONSE => {
				Ok(Self::AuthenticationResponse(NasAuthenticationResponse::decode_body(body)?))
			}
			MT_AUTHENTICATION_REJECT => {
				Ok(Self::AuthenticationReject(NasAuthenticationReject::decode_body(body)?))
			}
			MT_SECURITY_MODE_COMMAND => {
				Ok(Self::SecurityModeCommand(NasSecurityModeCommand::decode_body(body)?))
			}
			MT_SECURITY_MODE_COMPLETE => {
				Ok(Self::SecurityModeComplete(NasSecurityModeComplete::decode_body(body)?))
			}
			MT_GMM_STATUS => Ok(Self::GmmStatus(NasGmmStatus::decode_body(body)?)),
			MT_CONFIGURATION_UPDATE_COMMAND => Ok(Self::ConfigurationUpdateCommand(
				NasConfigurationUpdateCommand::decode_body(body)?,
			)),
			MT_UL_NAS_TRANSPORT => {
				Ok(Self::UlNasTransport(NasUlNasTransport::decode_body(body)?))
			}
			MT_DL_NAS_TRANSPORT => {
				Ok(Self::DlNasTransport(NasDlNasTransport::decode_body(body)?))
			}
			other => Err(NasDecodeError::UnknownMessageType(other)),
		}
	}

	pub fn encode(&self) -> Result<Vec<u8>, NasEncodeError> {
		match self {
			Self::RegistrationRequest(inner) => inner.encode(),
			Self::RegistrationAccept(inner) => inner.encode(),
			Self::RegistrationComplete(inner) => Ok(inner.encode()),
			Self::RegistrationReject(inner) => Ok(inner.encode()),
			Self::AuthenticationRequest(inner) => Ok(inner.encode()),
			Self::AuthenticationResponse(inner) => Ok(inner.encode()),
			Self::AuthenticationReject(inner) => Ok(inner.encode()),
			Self::SecurityModeCommand(inner) => Ok(inner.encode()),
			Self::SecurityModeComplete(inner) => inner.encode(),
			Self::GmmStatus(inner) => Ok(inner.encode()),
			Self::ConfigurationUpdateCommand(inner) => Ok(inner.encode()),
			Self::UlNasTransport(inner) => Ok(inner.encode()),
			Self::DlNasTransport(inner) => Ok(inner.encode()),
		}
	}
}
