mod firestore_store_tests;
mod memory_store_tests;
