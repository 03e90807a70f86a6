//! Wire-to-model enumeration mapping.
//!
//! The manifest and the persisted model each own their enumerations. Every
//! pair is mapped by an exhaustive match so adding a variant on either side
//! fails to compile until the mapping is updated.

use crate::model;

use super::types::{AutostartMethod, ConsoleType, ProcessTerminationMethod, ScriptType};

impl From<AutostartMethod> for model::AutostartMethod {
  fn from(value: AutostartMethod) -> Self {
    match value {
      AutostartMethod::OnApplicationStart => model::AutostartMethod::OnApplicationStart,
      AutostartMethod::OnPlayerActivity => model::AutostartMethod::OnPlayerActivity,
    }
  }
}

impl From<ProcessTerminationMethod> for model::ProcessTerminationMethod {
  fn from(value: ProcessTerminationMethod) -> Self {
    match value {
      ProcessTerminationMethod::SigHup => model::ProcessTerminationMethod::SigHup,
      ProcessTerminationMethod::SigInt => model::ProcessTerminationMethod::SigInt,
      ProcessTerminationMethod::SigKill => model::ProcessTerminationMethod::SigKill,
      ProcessTerminationMethod::SigTerm => model::ProcessTerminationMethod::SigTerm,
      ProcessTerminationMethod::Close => model::ProcessTerminationMethod::Close,
      ProcessTerminationMethod::Kill => model::ProcessTerminationMethod::Kill,
    }
  }
}

impl From<ConsoleType> for model::ConsoleType {
  fn from(value: ConsoleType) -> Self {
    match value {
      ConsoleType::LogFile => model::ConsoleType::LogFile,
      ConsoleType::Rcon => model::ConsoleType::Rcon,
    }
  }
}

impl From<ScriptType> for model::ScriptType {
  fn from(value: ScriptType) -> Self {
    match value {
      ScriptType::Install => model::ScriptType::Install,
      ScriptType::Uninstall => model::ScriptType::Uninstall,
      ScriptType::NameChange => model::ScriptType::NameChange,
      ScriptType::KeyChange => model::ScriptType::KeyChange,
      ScriptType::SaveUpload => model::ScriptType::SaveUpload,
      ScriptType::SaveDownload => model::ScriptType::SaveDownload,
      ScriptType::DetectInstall => model::ScriptType::DetectInstall,
      ScriptType::BeforeStart => model::ScriptType::BeforeStart,
      ScriptType::AfterStop => model::ScriptType::AfterStop,
    }
  }
}
