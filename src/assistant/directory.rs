//! Diretório de equipamentos consultado pelas ações do assistente.
//!
//! O motor só lê o inventário. A implementação em memória carrega um
//! arquivo JSON com equipamentos, trabalhadores e empréstimos.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{MotrizError, MotrizResult};

/// Estado físico do equipamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceStatus {
    #[default]
    #[serde(rename = "OPERATIVO")]
    Operational,
    #[serde(rename = "MANTENCIÓN", alias = "MANTENCION")]
    Maintenance,
    #[serde(rename = "BAJA")]
    Retired,
}

/// Estado de um empréstimo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoanStatus {
    #[default]
    #[serde(rename = "ASIGNADO")]
    Assigned,
    #[serde(rename = "DEVUELTO")]
    Returned,
    #[serde(rename = "VENCIDO")]
    Overdue,
}

/// Equipamento do inventário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(alias = "serie")]
    pub serial: String,
    #[serde(default, alias = "marca")]
    pub brand: String,
    #[serde(default, alias = "modelo")]
    pub model: String,
    #[serde(default, rename = "type", alias = "tipo")]
    pub kind: String,
    #[serde(default, alias = "estado_dispositivo")]
    pub status: DeviceStatus,
}

impl Equipment {
    /// "marca modelo", ou "Sin especificar" se ambos estiverem vazios.
    pub fn brand_model(&self) -> String {
        let joined = format!("{} {}", self.brand, self.model);
        let joined = joined.trim();
        if joined.is_empty() {
            "Sin especificar".to_string()
        } else {
            joined.to_string()
        }
    }

    /// Tipo para agrupamento ("Sin tipo" quando vazio).
    pub fn kind_label(&self) -> &str {
        if self.kind.trim().is_empty() {
            "Sin tipo"
        } else {
            &self.kind
        }
    }
}

/// Trabalhador que pode receber equipamentos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub rut: String,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "obra")]
    pub site: String,
}

/// Empréstimo de um equipamento a um trabalhador.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(alias = "serie")]
    pub serial: String,
    #[serde(alias = "trabajador_rut")]
    pub rut: String,
    #[serde(default, alias = "estado_prestamo")]
    pub status: LoanStatus,
}

/// Equipamento com o trabalhador que o tem no momento (se houver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub equipment: Equipment,
    pub assigned_to: Option<Worker>,
}

impl EquipmentRecord {
    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }
}

/// Consultas somente leitura sobre o inventário.
#[async_trait]
pub trait EquipmentDirectory: Send + Sync {
    /// Busca por série (sem diferenciar caixa nem hífens, por substring).
    async fn find_equipment_by_serial(&self, serial: &str) -> MotrizResult<Option<EquipmentRecord>>;

    /// Equipamentos operativos sem empréstimo ativo.
    async fn list_available_equipment(&self) -> MotrizResult<Vec<Equipment>>;

    /// Equipamentos com empréstimo ativo, com o trabalhador.
    async fn list_loaned_equipment(&self) -> MotrizResult<Vec<EquipmentRecord>>;

    /// Todos os equipamentos que não estão de baixa.
    async fn list_all_equipment(&self) -> MotrizResult<Vec<EquipmentRecord>>;
}

/// Conteúdo do arquivo de inventário.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub loans: Vec<Loan>,
}

impl Inventory {
    /// Garante que todo empréstimo aponta para equipamento e trabalhador existentes.
    pub fn validate(&self) -> MotrizResult<()> {
        for loan in &self.loans {
            if !self.equipment.iter().any(|e| e.serial == loan.serial) {
                return Err(MotrizError::Directory(format!(
                    "empréstimo referencia série desconhecida: {}",
                    loan.serial
                )));
            }
            if !self.workers.iter().any(|w| w.rut == loan.rut) {
                return Err(MotrizError::Directory(format!(
                    "empréstimo referencia RUT desconhecido: {}",
                    loan.rut
                )));
            }
        }
        Ok(())
    }
}

/// Diretório em memória.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    inventory: Inventory,
}

impl InMemoryDirectory {
    pub fn new(inventory: Inventory) -> MotrizResult<Self> {
        inventory.validate()?;
        Ok(Self { inventory })
    }

    /// Diretório sem nenhum equipamento.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Carrega o inventário de um arquivo JSON.
    pub fn load(path: &Path) -> MotrizResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let inventory: Inventory = serde_json::from_str(&content)?;
        let directory = Self::new(inventory)?;

        tracing::info!(
            path = %path.display(),
            equipment = directory.inventory.equipment.len(),
            loans = directory.inventory.loans.len(),
            "Inventory loaded"
        );

        Ok(directory)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn active_holder(&self, serial: &str) -> Option<&Worker> {
        let loan = self
            .inventory
            .loans
            .iter()
            .find(|l| l.serial == serial && l.status == LoanStatus::Assigned)?;
        self.inventory.workers.iter().find(|w| w.rut == loan.rut)
    }

    fn record(&self, equipment: &Equipment) -> EquipmentRecord {
        EquipmentRecord {
            equipment: equipment.clone(),
            assigned_to: self.active_holder(&equipment.serial).cloned(),
        }
    }
}

fn serial_matches(serial: &str, query: &str) -> bool {
    let serial = serial.to_uppercase();
    serial.contains(query) || serial.replace('-', "").contains(query)
}

#[async_trait]
impl EquipmentDirectory for InMemoryDirectory {
    async fn find_equipment_by_serial(&self, serial: &str) -> MotrizResult<Option<EquipmentRecord>> {
        let query = serial.trim().to_uppercase();
        if query.is_empty() {
            return Ok(None);
        }

        Ok(self
            .inventory
            .equipment
            .iter()
            .find(|e| serial_matches(&e.serial, &query))
            .map(|e| self.record(e)))
    }

    async fn list_available_equipment(&self) -> MotrizResult<Vec<Equipment>> {
        Ok(self
            .inventory
            .equipment
            .iter()
            .filter(|e| e.status == DeviceStatus::Operational)
            .filter(|e| self.active_holder(&e.serial).is_none())
            .cloned()
            .collect())
    }

    async fn list_loaned_equipment(&self) -> MotrizResult<Vec<EquipmentRecord>> {
        let mut records = Vec::new();
        for loan in self
            .inventory
            .loans
            .iter()
            .filter(|l| l.status == LoanStatus::Assigned)
        {
            let equipment = self.inventory.equipment.iter().find(|e| e.serial == loan.serial);
            let worker = self.inventory.workers.iter().find(|w| w.rut == loan.rut);
            if let (Some(equipment), Some(worker)) = (equipment, worker) {
                records.push(EquipmentRecord {
                    equipment: equipment.clone(),
                    assigned_to: Some(worker.clone()),
                });
            }
        }
        Ok(records)
    }

    async fn list_all_equipment(&self) -> MotrizResult<Vec<EquipmentRecord>> {
        Ok(self
            .inventory
            .equipment
            .iter()
            .filter(|e| e.status != DeviceStatus::Retired)
            .map(|e| self.record(e))
            .collect())
    }
}
