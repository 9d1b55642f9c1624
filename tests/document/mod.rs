mod contract_test;
mod loader_test;
mod ordering_test;
mod settings_test;
mod structure_test;
