mod mobile_number_tests;
