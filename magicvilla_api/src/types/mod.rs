mod envelope;
pub use self::envelope::{ApiResponse, HttpStatusCode};

mod villa;
pub use self::villa::{
    PatchOp, PatchOperation, VillaCreateDto, VillaDto, VillaID, VillaUpdateDto, MAX_NAME_LEN,
};
