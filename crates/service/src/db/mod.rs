pub mod drug_store;
