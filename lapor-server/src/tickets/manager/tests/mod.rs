use super::*;
use crate::store::RedbStore;
use crate::tickets::signature::tests::signature_data_url;
use shared::models::Partner;
use shared::ticket::{AttachmentKind, CommentType, TicketStatus};

fn test_store() -> RedbStore {
    let store = RedbStore::open_in_memory().unwrap();
    store
        .upsert_partners(&[
            Partner {
                id: "p-1".into(),
                full_name: "CV Mitra Sejahtera".into(),
                district: "Bandung".into(),
            },
            Partner {
                id: "p-2".into(),
                full_name: "UD Sumber Pangan".into(),
                district: "Cimahi".into(),
            },
        ])
        .unwrap();
    store
}

fn create_test_manager() -> TicketManager {
    TicketManager::with_store(test_store(), DEFAULT_STORE_TIMEOUT)
}

// ========================================================================
// Actors
// ========================================================================

fn sekolah() -> Actor {
    Actor::new("u-sekolah", "sdn1", Role::Sekolah, "Bu Sari").with_school("sch-1")
}

fn other_sekolah() -> Actor {
    Actor::new("u-sekolah-2", "sdn2", Role::Sekolah, "Pak Joko").with_school("sch-2")
}

fn murid() -> Actor {
    Actor::new("u-murid", "budi", Role::Murid, "Budi").with_school("sch-1")
}

fn daerah() -> Actor {
    Actor::new("u-daerah", "dinas", Role::Daerah, "Pak Andi")
}

fn pusat() -> Actor {
    Actor::new("u-pusat", "pusat", Role::Pusat, "Ibu Rina")
}

fn mitra() -> Actor {
    Actor::new("u-mitra", "mitra1", Role::Mitra, "CV Mitra Sejahtera")
}

// ========================================================================
// Helpers
// ========================================================================

fn photo() -> Attachment {
    Attachment::new(AttachmentKind::Image, Some("image/jpeg".into()), vec![0xFF, 0xD8, 0xFF, 1, 2, 3])
}

async fn open_ticket(manager: &TicketManager) -> Ticket {
    manager
        .create_ticket(
            &sekolah(),
            "Nasi basi".into(),
            "Porsi makan siang berbau asam".into(),
            Category::KualitasMakanan,
            None,
            "SDN 1 Bandung".into(),
            None,
        )
        .await
        .unwrap()
}
