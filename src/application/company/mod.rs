pub mod accounts;
pub mod company_profile;

pub use accounts::{AccountDto, ListAccountsResponse, ManageAccountsUseCase};
pub use company_profile::{
  CompanyProfileDto, GetCompanyProfileUseCase, UpdateCompanyProfileUseCase,
};
