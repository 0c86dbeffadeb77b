//! The UE 5GMM state machine. Downlink messages arrive as events, the
//! matching uplinks land on the UE context outbox, and errors the engine
//! must act on are parked in `procedure_error`.

use gnbsim_nas::message::NasUlNasTransport;
use gnbsim_nas::parser::GmmMessage;
use gnbsim_nas::security::SecurityHeaderType;
use statig::prelude::*;
use tracing::warn;

use super::nas_context::NasContext;
use super::{NasBuilder, NasEngineError, NasHandler};
use crate::context::UeContext;
use crate::context::ue_context::Rcvd;

#[derive(Debug)]
pub enum GmmEvent {
	/// Emit the initial Registration Request.
	RegistrationTrigger,
	/// Emit the UL NAS Transport with the PDU session establishment request.
	PduSessionTrigger,
	Downlink(GmmMessage),
}

fn park_error(
	context: &mut UeContext,
	result: Result<(), NasEngineError>,
) -> bool {
	match result {
		Ok(()) => true,
		Err(error) => {
			context.procedure_error = Some(error);
			false
		}
	}
}

#[state_machine(
	initial = "State::deregistered()",
	state(derive(Debug, Clone)),
	superstate(derive(Debug, Clone))
)]
impl NasContext {
	#[state(superstate = "attached")]
	async fn deregistered(
		&mut self,
		context: &mut UeContext,
		event: &GmmEvent,
	) -> Response<State> {
		match event {
			GmmEvent::RegistrationTrigger => {
				let request =
					gnbsim_nas::message::NasRegistrationRequest::build(self, context)
						.and_then(|request| request.encode().map_err(NasEngineError::from));
				match request {
					Ok(plain) => {
						self.registration_request = Some(plain.clone());
						context.pending_uplinks.push_back(plain);
						Transition(State::registered_initiated())
					}
					Err(error) => {
						context.procedure_error = Some(error);
						Handled
					}
				}
			}
			_ => Super,
		}
	}

	#[state(superstate = "attached")]
	async fn registered_initiated(
		&mut self,
		context: &mut UeContext,
		event: &GmmEvent,
	) -> Response<State> {
		let GmmEvent::Downlink(message) = event else {
			return Super;
		};
		match message {
			GmmMessage::AuthenticationRequest(request) => {
				context.last_rcvd = Rcvd::AuthRequest;
				let outcome = request.handle(self, context).await;
				park_error(context, outcome);
				Handled
			}
			GmmMessage::SecurityModeCommand(command) => {
				context.last_rcvd = Rcvd::SecModeCommand;
				let outcome = command.handle(self, context).await;
				park_error(context, outcome);
				Handled
			}
			GmmMessage::RegistrationAccept(accept) => {
				context.last_rcvd = Rcvd::RegAccept;
				let outcome = accept.handle(self, context).await;
				if park_error(context, outcome) {
					Transition(State::registered())
				} else {
					Handled
				}
			}
			GmmMessage::RegistrationReject(reject) => {
				context.procedure_error = Some(NasEngineError::Protocol {
					message: "registration rejected",
					state: context.last_rcvd,
				});
				warn!(cause = reject.cause, "registration rejected");
				Transition(State::deregistered())
			}
			GmmMessage::AuthenticationReject(_) => {
				context.procedure_error = Some(NasEngineError::Protocol {
					message: "authentication rejected",
					state: context.last_rcvd,
				});
				Transition(State::deregistered())
			}
			_ => Super,
		}
	}

	#[state(superstate = "attached")]
	async fn registered(
		&mut self,
		context: &mut UeContext,
		event: &GmmEvent,
	) -> Response<State> {
		match event {
			GmmEvent::PduSessionTrigger => {
				match NasUlNasTransport::build(self, context) {
					Ok(transport) => {
						let frame = context.seal_uplink(
							transport.encode(),
							SecurityHeaderType::IntegrityProtectedAndCiphered,
						);
						context.pending_uplinks.push_back(frame);
					}
					Err(error) => context.procedure_error = Some(error),
				}
				Handled
			}
			GmmEvent::Downlink(GmmMessage::DlNasTransport(transport)) => {
				let outcome = transport.handle(self, context).await;
				park_error(context, outcome);
				Handled
			}
			_ => Super,
		}
	}

	/// Part of the 5GMM state set; no procedure in scope enters it.
	#[state(superstate = "attached")]
	async fn service_request_initiated(
		&mut self,
		context: &mut UeContext,
		event: &GmmEvent,
	) -> Response<State> {
		let _ = (&context, &event);
		Super
	}

	/// Part of the 5GMM state set; deregistration is out of scope.
	#[state(superstate = "attached")]
	async fn deregistered_initiated(
		&mut self,
		context: &mut UeContext,
		event: &GmmEvent,
	) -> Response<State> {
		let _ = (&context, &event);
		Super
	}

	/// Messages every 5GMM state accepts, plus the catch-all that logs and
	/// drops whatever the current procedure does not expect.
	#[superstate]
	async fn attached(
		&mut self,
		context: &mut UeContext,
		event: &GmmEvent,
	) -> Response<State> {
		match event {
			GmmEvent::Downlink(GmmMessage::GmmStatus(status)) => {
				warn!(cause = status.cause, "5GMM status from the core");
				Handled
			}
			GmmEvent::Downlink(GmmMessage::ConfigurationUpdateCommand(command)) => {
				warn!(len = command.body.len(), "configuration update command observed");
				Handled
			}
			other => {
				warn!(state = ?context.last_rcvd, event = ?other, "event dropped in current state");
				Handled
			}
		}
	}
}
