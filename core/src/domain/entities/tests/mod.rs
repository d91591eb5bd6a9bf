mod verification_challenge_tests;
