mod solve_tests;
