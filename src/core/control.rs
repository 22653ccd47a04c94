//! Control commands sent to the simulation server
//!
//! Fire-and-forget POSTs. The local side effects (trail clear, trail quiet
//! period, blank canvas) are applied by `PendulumState::apply_command`
//! before the request resolves, and are never rolled back.

use serde::Serialize;

use super::config::{RESET_PATH, RESTART_PATH, UPDATE_PATH};
use super::error::{ClientError, Result};

/// Body of `POST /update`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PendulumParams {
    pub length_rod_1: f64,
    pub length_rod_2: f64,
    pub mass_bob_1: f64,
    pub mass_bob_2: f64,
    pub g: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControlCommand {
    /// Transient reset of the running simulation
    Reset,
    /// Full re-seed of the simulation
    Restart,
    /// Replace the physical parameters
    Update(PendulumParams),
}

impl ControlCommand {
    pub fn path(&self) -> &'static str {
        match self {
            ControlCommand::Reset => RESET_PATH,
            ControlCommand::Restart => RESTART_PATH,
            ControlCommand::Update(_) => UPDATE_PATH,
        }
    }

    /// JSON body, if the command carries one
    pub fn body(&self) -> Result<Option<String>> {
        match self {
            ControlCommand::Update(params) => Ok(Some(serde_json::to_string(params)?)),
            _ => Ok(None),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::Reset => "reset",
            ControlCommand::Restart => "restart",
            ControlCommand::Update(_) => "update",
        }
    }
}

/// Raw text of the parameter inputs, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamsForm {
    pub length_rod_1: String,
    pub length_rod_2: String,
    pub mass_bob_1: String,
    pub mass_bob_2: String,
    pub g: String,
}

impl ParamsForm {
    /// Form pre-filled with the server's initial parameters.
    pub fn with_defaults() -> Self {
        Self {
            length_rod_1: "150".into(),
            length_rod_2: "150".into(),
            mass_bob_1: "10".into(),
            mass_bob_2: "10".into(),
            g: "1".into(),
        }
    }

    /// Every field must be present and numeric before an update is sent.
    pub fn validate(&self) -> Result<PendulumParams> {
        Ok(PendulumParams {
            length_rod_1: field("length_rod_1", &self.length_rod_1)?,
            length_rod_2: field("length_rod_2", &self.length_rod_2)?,
            mass_bob_1: field("mass_bob_1", &self.mass_bob_1)?,
            mass_bob_2: field("mass_bob_2", &self.mass_bob_2)?,
            g: field("g", &self.g)?,
        })
    }
}

fn field(name: &'static str, raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::MissingField(name));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ClientError::InvalidField(name))
}

/// At most one control command in flight at a time.
#[derive(Debug, Default)]
pub struct CommandGate {
    in_flight: Option<&'static str>,
}

impl CommandGate {
    /// Claim the gate for `command`, or `Err(Busy)` if one is pending.
    pub fn begin(&mut self, command: &ControlCommand) -> Result<()> {
        if self.in_flight.is_some() {
            return Err(ClientError::Busy);
        }
        self.in_flight = Some(command.name());
        Ok(())
    }

    pub fn finish(&mut self) {
        self.in_flight = None;
    }

    pub fn in_flight(&self) -> Option<&'static str> {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_field_names() {
        let cmd = ControlCommand::Update(PendulumParams {
            length_rod_1: 100.0,
            length_rod_2: 80.0,
            mass_bob_1: 5.0,
            mass_bob_2: 7.5,
            g: 9.81,
        });
        let body = cmd.body().unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["length_rod_1"], 100.0);
        assert_eq!(json["length_rod_2"], 80.0);
        assert_eq!(json["mass_bob_1"], 5.0);
        assert_eq!(json["mass_bob_2"], 7.5);
        assert_eq!(json["g"], 9.81);
        assert_eq!(cmd.path(), "/update");
    }

    #[test]
    fn test_reset_restart_have_no_body() {
        assert_eq!(ControlCommand::Reset.body().unwrap(), None);
        assert_eq!(ControlCommand::Restart.body().unwrap(), None);
        assert_eq!(ControlCommand::Reset.path(), "/reset");
        assert_eq!(ControlCommand::Restart.path(), "/restart");
    }

    #[test]
    fn test_form_requires_all_fields() {
        assert!(ParamsForm::with_defaults().validate().is_ok());

        let mut form = ParamsForm::with_defaults();
        form.mass_bob_2 = "  ".into();
        assert!(matches!(
            form.validate(),
            Err(ClientError::MissingField("mass_bob_2"))
        ));

        let mut form = ParamsForm::with_defaults();
        form.g = "abc".into();
        assert!(matches!(form.validate(), Err(ClientError::InvalidField("g"))));

        let mut form = ParamsForm::with_defaults();
        form.length_rod_1 = "inf".into();
        assert!(matches!(
            form.validate(),
            Err(ClientError::InvalidField("length_rod_1"))
        ));
    }

    #[test]
    fn test_gate_rejects_overlap() {
        let mut gate = CommandGate::default();
        gate.begin(&ControlCommand::Reset).unwrap();
        assert_eq!(gate.in_flight(), Some("reset"));
        assert!(matches!(
            gate.begin(&ControlCommand::Restart),
            Err(ClientError::Busy)
        ));
        gate.finish();
        assert!(gate.begin(&ControlCommand::Restart).is_ok());
    }
}
