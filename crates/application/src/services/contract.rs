//! Contract listings.

use common::ContractId;
use domain::{CollectionRepository, Contract, Repository, RepositoryError};
use thiserror::Error;

use super::SharedCollectionRepository;
use crate::dto::ContractSummaryDto;

#[derive(Debug, Error)]
pub enum ContractServiceError {
    #[error("Contract with ID {0} not found.")]
    NotFound(ContractId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, ContractServiceError>;

/// Read-only access to the contracts on offer.
pub struct ContractService {
    contracts: SharedCollectionRepository<Contract>,
}

impl ContractService {
    pub fn new(contracts: SharedCollectionRepository<Contract>) -> Self {
        Self { contracts }
    }

    pub fn get_available_contracts(&self) -> Result<Vec<ContractSummaryDto>> {
        let contracts = self.contracts.get_all()?;
        tracing::debug!(count = contracts.len(), "contracts listed");
        Ok(contracts.iter().map(ContractSummaryDto::from).collect())
    }

    pub fn get_contract(&self, id: ContractId) -> Result<ContractSummaryDto> {
        self.contracts
            .get(id)?
            .as_ref()
            .map(ContractSummaryDto::from)
            .ok_or(ContractServiceError::NotFound(id))
    }
}
