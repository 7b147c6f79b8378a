mod cancel;

use lionsclub_test_utils::prelude::*;
