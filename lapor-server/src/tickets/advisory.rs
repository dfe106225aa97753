//! Advisory generator
//!
//! Role-specific guidance derived from ticket state. The text comes from a
//! fixed table keyed on (role, status); only the summary, the insights and
//! the `{title}` / `{school}` placeholders are filled from the ticket.
//! Same input, same bytes out.

use shared::models::{Advice, Role};
use shared::ticket::{AuthorRole, Priority, Ticket, TicketStatus};

/// Canned text for one (role, status) cell
struct Playbook {
    guidance: &'static str,
    next_steps: &'static [&'static str],
    draft_reply: &'static str,
    status_advice: &'static str,
}

fn playbook(role: Role, status: TicketStatus) -> Playbook {
    use Role::*;
    use TicketStatus::*;

    match (role, status) {
        // ── closed tickets ─────────────────────────────────────────
        (Murid, Resolved | Rejected) => Playbook {
            guidance: "Laporanmu sudah ditutup. Terima kasih sudah peduli pada makanan di sekolahmu.",
            next_steps: &["Buat laporan baru jika masalah yang sama terjadi lagi"],
            draft_reply: "Terima kasih atas laporan \"{title}\".",
            status_advice: "Laporan sudah ditutup.",
        },
        (_, Resolved) => Playbook {
            guidance: "Laporan telah disetujui dan dinyatakan selesai. Tidak ada tindakan status yang tersisa.",
            next_steps: &[
                "Arsipkan bukti tindak lanjut",
                "Pantau apakah masalah serupa muncul kembali di {school}",
            ],
            draft_reply: "Laporan \"{title}\" telah dinyatakan selesai. Terima kasih atas kerja samanya.",
            status_advice: "Status final: selesai. Laporan tidak dapat diubah lagi.",
        },
        (_, Rejected) => Playbook {
            guidance: "Laporan telah ditolak. Tidak ada tindakan status yang tersisa.",
            next_steps: &[
                "Pastikan alasan penolakan tercatat di riwayat",
                "Ajukan laporan baru bila ada bukti tambahan",
            ],
            draft_reply: "Laporan \"{title}\" ditolak. Silakan ajukan laporan baru bila ada bukti tambahan.",
            status_advice: "Status final: ditolak. Laporan tidak dapat diubah lagi.",
        },

        // ── pusat ──────────────────────────────────────────────────
        (Pusat, Pending) => Playbook {
            guidance: "Mode pemantauan: laporan masih ditangani dinas daerah. Pusat belum dapat menambah komentar atau mengambil tindakan.",
            next_steps: &[
                "Pantau perkembangan penanganan oleh dinas daerah",
                "Tunggu eskalasi bila daerah membutuhkan keputusan pusat",
            ],
            draft_reply: "",
            status_advice: "Menunggu penanganan daerah. Pusat dapat bertindak setelah laporan dieskalasi.",
        },
        (Pusat, Escalated) => Playbook {
            guidance: "Laporan telah dieskalasi ke pusat dan menunggu keputusan Anda.",
            next_steps: &[
                "Tinjau bukti dan riwayat penanganan daerah",
                "Koordinasikan dengan mitra yang ditugaskan",
                "Setujui atau tolak laporan dengan tanda tangan",
            ],
            draft_reply: "Pusat telah menerima eskalasi laporan \"{title}\" dari {school} dan sedang meninjaunya.",
            status_advice: "Keputusan akhir ada di pusat: setujui atau tolak.",
        },

        // ── daerah ─────────────────────────────────────────────────
        (Daerah, Pending) => Playbook {
            guidance: "Laporan baru menunggu verifikasi dinas daerah.",
            next_steps: &[
                "Verifikasi laporan dengan pihak sekolah",
                "Tugaskan mitra terkait bila diperlukan",
                "Setujui, tolak, atau eskalasi ke pusat dengan tanda tangan",
            ],
            draft_reply: "Dinas daerah telah menerima laporan \"{title}\" dari {school} dan sedang melakukan verifikasi.",
            status_advice: "Eskalasi bila laporan membutuhkan keputusan pusat; jika tidak, setujui atau tolak.",
        },
        (Daerah, Escalated) => Playbook {
            guidance: "Laporan sedang ditinjau pusat. Dinas daerah tetap dapat melengkapi bukti dan menutup laporan.",
            next_steps: &[
                "Lengkapi bukti pendukung untuk pusat",
                "Perbarui tautan laporan siswa bila ada temuan baru",
            ],
            draft_reply: "Laporan \"{title}\" telah diteruskan ke pusat untuk keputusan lebih lanjut.",
            status_advice: "Menunggu keputusan pusat.",
        },

        // ── sekolah ────────────────────────────────────────────────
        (Sekolah, Pending) => Playbook {
            guidance: "Laporan Anda sedang diverifikasi dinas daerah.",
            next_steps: &[
                "Tambahkan foto atau keterangan pendukung",
                "Tanggapi pertanyaan dari dinas daerah",
            ],
            draft_reply: "Kami dari {school} siap memberikan keterangan tambahan terkait laporan \"{title}\".",
            status_advice: "Menunggu verifikasi dinas daerah.",
        },
        (Sekolah, Escalated) => Playbook {
            guidance: "Laporan Anda telah dieskalasi ke pusat.",
            next_steps: &["Siapkan bukti tambahan bila diminta pusat"],
            draft_reply: "Kami dari {school} menunggu keputusan pusat terkait laporan \"{title}\".",
            status_advice: "Menunggu keputusan pusat.",
        },

        // ── mitra ──────────────────────────────────────────────────
        (Mitra, Pending) => Playbook {
            guidance: "Anda terkait dengan laporan ini. Berikan klarifikasi kepada dinas daerah.",
            next_steps: &[
                "Periksa proses produksi dan distribusi terkait",
                "Kirim klarifikasi beserta foto pendukung",
            ],
            draft_reply: "Kami telah menerima laporan \"{title}\" dari {school} dan sedang melakukan pengecekan internal.",
            status_advice: "Menunggu verifikasi dinas daerah.",
        },
        (Mitra, Escalated) => Playbook {
            guidance: "Laporan telah dieskalasi ke pusat. Siapkan klarifikasi lengkap.",
            next_steps: &[
                "Siapkan dokumen dan bukti perbaikan",
                "Koordinasikan tindak lanjut dengan dinas daerah",
            ],
            draft_reply: "Kami siap berkoordinasi dengan pusat terkait laporan \"{title}\".",
            status_advice: "Menunggu keputusan pusat.",
        },

        // ── murid ──────────────────────────────────────────────────
        (Murid, Pending | Escalated) => Playbook {
            guidance: "Laporanmu sudah diterima dan sedang ditindaklanjuti.",
            next_steps: &["Tunggu kabar dari sekolah"],
            draft_reply: "",
            status_advice: "Laporan sedang diproses.",
        },
    }
}

/// Substitute `{title}` and `{school}` in one pass; substituted text is
/// never scanned again.
fn fill(template: &str, ticket: &Ticket) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{title}") {
            out.push_str(&ticket.title);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{school}") {
            out.push_str(&ticket.school_name);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn insights(ticket: &Ticket) -> Vec<String> {
    let mut out = Vec::new();

    match ticket.comments.last() {
        Some(last) => out.push(format!(
            "{} entri di riwayat; terakhir oleh {} ({})",
            ticket.comments.len(),
            last.author,
            last.role.as_str()
        )),
        None => out.push("Belum ada entri di riwayat".to_string()),
    }

    let signed = ticket.comments.iter().filter(|c| c.is_signed()).count();
    if signed > 0 {
        out.push(format!("{signed} tindakan bertanda tangan"));
    }

    let system = ticket
        .comments
        .iter()
        .filter(|c| c.role == AuthorRole::System)
        .count();
    if system > 0 {
        out.push(format!("{system} perubahan administratif tercatat"));
    }

    if ticket.student_reports.is_empty() {
        out.push("Tidak ada laporan siswa yang ditautkan".to_string());
    } else {
        out.push(format!(
            "{} laporan siswa ditautkan",
            ticket.student_reports.len()
        ));
    }

    if ticket.assigned_mitra.is_empty() {
        out.push("Belum ada mitra yang ditugaskan".to_string());
    } else {
        out.push(format!(
            "Mitra ditugaskan: {}",
            ticket.assigned_mitra.join(", ")
        ));
    }

    if ticket.priority >= Priority::High && !ticket.status.is_terminal() {
        out.push(format!(
            "Prioritas {}: tangani segera",
            ticket.priority.label()
        ));
    }

    out
}

/// Guidance for `role` looking at `ticket`
pub fn advise(role: Role, ticket: &Ticket) -> Advice {
    let book = playbook(role, ticket.status);

    Advice {
        summary: format!(
            "Laporan \"{}\" dari {} ({}, prioritas {}) berstatus {}.",
            ticket.title,
            ticket.school_name,
            ticket.category.label(),
            ticket.priority.label(),
            ticket.status.label()
        ),
        insights: insights(ticket),
        guidance: book.guidance.to_string(),
        next_steps: book.next_steps.iter().map(|s| fill(s, ticket)).collect(),
        draft_reply: fill(book.draft_reply, ticket),
        status_advice: book.status_advice.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ticket::{Category, CommentType, NewComment};

    fn ticket(status: TicketStatus) -> Ticket {
        let mut t = Ticket::new("t-1".into());
        t.title = "Nasi basi".into();
        t.school_name = "SDN 1 Bandung".into();
        t.category = Category::KualitasMakanan;
        t.status = status;
        t
    }

    #[test]
    fn test_deterministic() {
        let mut t = ticket(TicketStatus::Pending);
        t.comments
            .append(NewComment {
                id: "c-1".into(),
                author_id: "u-1".into(),
                author: "Bu Sari".into(),
                role: AuthorRole::Sekolah,
                time: 1,
                message: "Foto terlampir".into(),
                comment_type: CommentType::Text,
                attachment: None,
            })
            .unwrap();
        for role in Role::ALL {
            assert_eq!(advise(role, &t), advise(role, &t));
        }
    }

    #[test]
    fn test_pusat_monitoring_then_actionable() {
        let pending = advise(Role::Pusat, &ticket(TicketStatus::Pending));
        assert!(pending.guidance.starts_with("Mode pemantauan"));
        assert!(pending.draft_reply.is_empty());

        let escalated = advise(Role::Pusat, &ticket(TicketStatus::Escalated));
        assert!(escalated.guidance.contains("menunggu keputusan Anda"));
        assert!(escalated.draft_reply.contains("SDN 1 Bandung"));
    }

    #[test]
    fn test_summary_interpolation() {
        let advice = advise(Role::Daerah, &ticket(TicketStatus::Pending));
        assert_eq!(
            advice.summary,
            "Laporan \"Nasi basi\" dari SDN 1 Bandung (Kualitas Makanan, prioritas Sedang) berstatus Menunggu."
        );
        assert!(advice.draft_reply.contains("\"Nasi basi\""));
    }

    #[test]
    fn test_insights_reflect_attachments() {
        let mut t = ticket(TicketStatus::Escalated);
        t.priority = Priority::Critical;
        t.assigned_mitra = vec!["CV Mitra Sejahtera".into()];
        let advice = advise(Role::Daerah, &t);
        assert!(advice.insights.contains(&"Belum ada entri di riwayat".to_string()));
        assert!(
            advice
                .insights
                .contains(&"Mitra ditugaskan: CV Mitra Sejahtera".to_string())
        );
        assert!(advice.insights.iter().any(|i| i.starts_with("Prioritas Kritis")));
    }

    #[test]
    fn test_terminal_text_is_shared_across_staff_roles() {
        let t = ticket(TicketStatus::Resolved);
        let daerah = advise(Role::Daerah, &t);
        let pusat = advise(Role::Pusat, &t);
        assert_eq!(daerah.status_advice, pusat.status_advice);
        assert_ne!(advise(Role::Murid, &t).guidance, daerah.guidance);
    }

    #[test]
    fn test_placeholders_in_ticket_text_stay_literal() {
        let mut t = ticket(TicketStatus::Pending);
        t.title = "Menu {school} {x".into();
        assert_eq!(
            fill("\"{title}\" dari {school}", &t),
            "\"Menu {school} {x\" dari SDN 1 Bandung"
        );
    }
}
