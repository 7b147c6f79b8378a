mod undo;

use lionsclub_test_utils::prelude::*;
