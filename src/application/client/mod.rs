pub mod add_client;
pub mod delete_client;
pub mod get_client;
pub mod list_clients;
pub mod search_clients;
pub mod update_client;

pub use add_client::{AddClientCommand, AddClientUseCase};
pub use delete_client::DeleteClientUseCase;
pub use get_client::{ClientDto, GetClientUseCase};
pub use list_clients::{
  CountClientsResponse, ListClientsCommand, ListClientsResponse, ListClientsUseCase,
};
pub use search_clients::{ClientsResponse, SearchClientsUseCase};
pub use update_client::{UpdateClientCommand, UpdateClientUseCase};
