mod create_transport_tests;
