//! Assistente de chat do Motriz.
//!
//! Recebe mensagens da aplicação hospedeira, resolve a intenção pela cadeia
//! de resolvedores, executa a ação de domínio no diretório de equipamentos
//! e realimenta o motor com o que aprendeu.
//!
//! ## Componentes
//!
//! - **Assistant**: orquestra o fluxo de chat
//! - **Actions**: ações de domínio, extração de séries e formatação
//! - **EquipmentDirectory**: consultas somente leitura ao inventário

mod actions;
mod directory;
mod service;
mod suggestions;

pub use actions::{
    execute, extract_serials, format_all, format_available, format_holder, format_loaned,
    infer_intent, Action, ERROR_TEXT, HELP_TEXT, SERIAL_NOT_FOUND,
};
pub use directory::{
    DeviceStatus, Equipment, EquipmentDirectory, EquipmentRecord, InMemoryDirectory, Inventory,
    Loan, LoanStatus, Worker,
};
pub use service::Assistant;
pub use suggestions::suggestions_for;
