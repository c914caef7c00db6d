pub mod constant;
pub mod error;
pub mod fixtures;
pub mod model;
pub mod setup;

pub use error::TestError;
pub use setup::{TestAppState, TestSetup};

pub mod prelude {
    pub use crate::{
        constant::{TEST_JWT_SECRET, TEST_SOCIETE_CODE},
        fixtures::{auth::TestRole, factory},
        test_setup_with_all_tables, test_setup_with_tables, test_setup_with_tenant_tables,
        TestError, TestSetup,
    };
}
